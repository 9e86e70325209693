use serde::{Deserialize, Serialize};

/// One order after normalization, in the column order the shipping provider's
/// manifest template expects. Serde renames carry the exact template headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub reference: String,
    #[serde(rename = "nom et prenom du destinataire*")]
    pub nom: String,
    #[serde(rename = "telephone*")]
    pub telephone: String,
    #[serde(rename = "telephone 2")]
    pub telephone_2: Option<String>,
    #[serde(rename = "code wilaya*")]
    pub code_wilaya: Option<u8>,
    #[serde(rename = "wilaya de livraison")]
    pub wilaya: String,
    #[serde(rename = "commune de livraison*")]
    pub commune: Option<String>,
    #[serde(rename = "adresse de livraison*")]
    pub adresse: String,
    #[serde(rename = "produit (référence)*")]
    pub produit: String,
    #[serde(rename = "poids (kg)")]
    pub poids: Option<String>,
    #[serde(rename = "montant du colis*")]
    pub montant: String,
    pub remarque: String,
    #[serde(rename = "FRAGILE")]
    pub fragile: Option<String>,
    #[serde(rename = "OUVRIR")]
    pub ouvrir: Option<String>,
    #[serde(rename = "ECHANGE")]
    pub echange: Option<String>,
    #[serde(rename = "STOP DESK")]
    pub stop_desk: Option<String>,
    #[serde(rename = "Lien map")]
    pub lien_map: Option<String>,
}

impl OrderRow {
    /// A row carrying only the fields the resolver reads; every template
    /// column starts empty and the geographic fields start unresolved.
    pub fn new(
        reference: impl Into<String>,
        nom: impl Into<String>,
        telephone: impl Into<String>,
        wilaya: impl Into<String>,
        adresse: impl Into<String>,
        produit: impl Into<String>,
        montant: impl Into<String>,
        remarque: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            nom: nom.into(),
            telephone: telephone.into(),
            telephone_2: None,
            code_wilaya: None,
            wilaya: wilaya.into(),
            commune: None,
            adresse: adresse.into(),
            produit: produit.into(),
            poids: None,
            montant: montant.into(),
            remarque: remarque.into(),
            fragile: None,
            ouvrir: None,
            echange: None,
            stop_desk: None,
            lien_map: None,
        }
    }
}

/// Result of one wilaya lookup, keyed by the distinct wilaya string observed
/// in the input. Written once per run and never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub code: Option<String>,
    pub commune: Option<String>,
    pub wilaya: String,
    pub adresse: String,
}

impl Resolution {
    pub fn unresolved(wilaya: impl Into<String>, adresse: impl Into<String>) -> Self {
        Self {
            code: None,
            commune: None,
            wilaya: wilaya.into(),
            adresse: adresse.into(),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.code.is_none() && self.commune.is_none()
    }
}

/// Fields extracted from the raw generation text. Either side may be missing;
/// that is an expected condition, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReply {
    pub code: Option<String>,
    pub commune: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<OrderRow>,
    pub manifest_csv: String,
    /// Wilaya values whose lookup produced neither a code nor a commune.
    pub unresolved: Vec<String>,
}
