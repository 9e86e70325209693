use crate::domain::model::OrderRow;
use crate::utils::error::{EtlError, Result};
use csv::StringRecord;

const COL_NOM: &str = "الاسم و لقب";
const COL_TELEPHONE: &str = "رقم الهاتف";
const COL_WILAYA: &str = "الولاية";
const COL_ADRESSE: &str = "العنوان";
const COL_PRODUIT: &str = "produits";
const COL_MONTANT: &str = "السعر";
const COL_COMMENT_1: &str = "comment-1";
const COL_COMMENT_2: &str = "comment-2";
const COL_COMMENT_3: &str = "comment-3";

const DEFAULT_NOM: &str = "pas de nom";

/// The shipping provider's template headers, in upload order.
const MANIFEST_HEADERS: [&str; 17] = [
    "reference",
    "nom et prenom du destinataire*",
    "telephone*",
    "telephone 2",
    "code wilaya*",
    "wilaya de livraison",
    "commune de livraison*",
    "adresse de livraison*",
    "produit (référence)*",
    "poids (kg)",
    "montant du colis*",
    "remarque",
    "FRAGILE",
    "OUVRIR",
    "ECHANGE",
    "STOP DESK",
    "Lien map",
];

/// Column positions located once from the export's header row. The merchant
/// export mixes Arabic and Latin headers; anything not named here (status,
/// EXPEDITION, ...) is dropped by not being selected.
#[derive(Debug)]
struct ColumnIndex {
    nom: usize,
    telephone: usize,
    wilaya: usize,
    adresse: usize,
    produit: usize,
    montant: usize,
    comment_1: Option<usize>,
    comment_2: Option<usize>,
    comment_3: Option<usize>,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| EtlError::ProcessingError {
                message: format!("raw export has no '{}' column", name),
            })
        };

        Ok(Self {
            nom: require(COL_NOM)?,
            telephone: require(COL_TELEPHONE)?,
            wilaya: require(COL_WILAYA)?,
            adresse: require(COL_ADRESSE)?,
            produit: require(COL_PRODUIT)?,
            montant: require(COL_MONTANT)?,
            comment_1: find(COL_COMMENT_1),
            comment_2: find(COL_COMMENT_2),
            comment_3: find(COL_COMMENT_3),
        })
    }

    fn to_order_row(&self, record: &StringRecord) -> OrderRow {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let optional = |idx: Option<usize>| idx.map(|i| cell(i)).unwrap_or_default();

        let nom = {
            let raw = cell(self.nom);
            if raw.is_empty() {
                DEFAULT_NOM.to_string()
            } else {
                raw
            }
        };
        let produit = cell(self.produit);
        let remarque = format!(
            "{}+{}+{}",
            optional(self.comment_3),
            optional(self.comment_1),
            optional(self.comment_2)
        );

        OrderRow::new(
            produit.clone(),
            nom,
            format_phone(&cell(self.telephone)),
            cell(self.wilaya),
            cell(self.adresse),
            produit,
            cell(self.montant),
            remarque,
        )
    }
}

/// The export stores numbers without the leading zero and with stray spaces.
fn format_phone(raw: &str) -> String {
    format!("0{}", raw.replace(' ', ""))
}

/// Normalizes the merchant's raw CSV export into manifest-shaped rows.
pub fn clean_csv(raw: &[u8]) -> Result<Vec<OrderRow>> {
    let mut reader = csv::Reader::from_reader(raw);
    let headers = reader.headers()?.clone();
    let index = ColumnIndex::locate(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(index.to_order_row(&record));
    }

    tracing::debug!("Cleaned {} rows from raw export", rows.len());
    Ok(rows)
}

/// Renders enriched rows in the provider's fixed 17-column template order.
/// The header row is written even when there are no orders, so an empty
/// export still yields a valid template file.
pub fn render_manifest(rows: &[OrderRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(MANIFEST_HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::ProcessingError {
            message: format!("manifest rendering failed: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("manifest is not valid UTF-8: {}", e),
    })
}
