use serde::{Deserialize, Deserializer};
use std::io::Read;

const DEFAULT_SCORER: &str = "crm-import";

#[derive(Debug)]
pub(crate) struct CrmScoreRow {
    pub(crate) attribute_key: String,
    pub(crate) raw_value: f64,
    pub(crate) scored_by: String,
}

/// Parse a scorecard export. Rows with a blank attribute key or an unparsable value
/// are dropped; exports routinely carry trailing blank lines and subtotal rows.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CrmScoreRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RawRow>() {
        let row = record?;

        let Some(attribute_key) = row.attribute else {
            continue;
        };
        let Some(raw_value) = row.value.as_deref().and_then(parse_number) else {
            continue;
        };

        rows.push(CrmScoreRow {
            attribute_key,
            raw_value,
            scored_by: row
                .scored_by
                .unwrap_or_else(|| DEFAULT_SCORER.to_string()),
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Attribute", default, deserialize_with = "empty_string_as_none")]
    attribute: Option<String>,
    #[serde(rename = "Raw Value", default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(rename = "Scored By", default, deserialize_with = "empty_string_as_none")]
    scored_by: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim().trim_end_matches('%');
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}
