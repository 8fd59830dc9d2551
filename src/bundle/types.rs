use serde::{Deserialize, Deserializer, Serialize};

/// Value stored in `sourceType` for every row this tool produces
pub const SOURCE_TYPE_BUNDLED: &str = "BUNDLED";

/// Name reported for a collection that carries none
pub const UNKNOWN_COLLECTION: &str = "Unknown Collection";

/// The input document: `{ "collections": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoemBundle {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub collections: Vec<Collection>,
}

/// An input-only grouping of poems
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub poems: Vec<PoemSource>,
}

impl Collection {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_COLLECTION)
    }
}

/// One poem as it appears in the bundle. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoemSource {
    #[serde(default, deserialize_with = "text_field")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub first_line: Option<String>,
}

/// One row of the `poems` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoemRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub first_line: String,
    pub source_type: String,
}

impl PoemRecord {
    /// Map a bundle poem onto the row layout, defaulting absent fields to ""
    pub fn from_source(poem: &PoemSource) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        PoemRecord {
            id: field(&poem.id),
            title: field(&poem.title),
            author: field(&poem.author),
            content: field(&poem.text),
            first_line: field(&poem.first_line),
            source_type: SOURCE_TYPE_BUNDLED.to_string(),
        }
    }
}

/// Scalars a poem field may hold in the wild
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Flag(bool),
}

/// Accept strings, numbers and booleans as text; `null` counts as absent
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => real_as_text(n),
        Scalar::Flag(b) => b.to_string(),
    }))
}

/// Render a float the way SQLite turns a REAL into TEXT: 15 significant
/// digits, `%g` style exponents, and a `.0` kept on integral values
fn real_as_text(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    if n == 0.0 {
        return "0.0".to_string();
    }

    let scientific = format!("{:.14e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return n.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..15).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (14 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, n))
    }
}

fn trim_fraction(digits: &str) -> String {
    if !digits.contains('.') {
        return format!("{digits}.0");
    }
    let trimmed = digits.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
