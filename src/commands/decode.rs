use crate::skyline::{Building, Direction, Point, Skyline, SkylinePair};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// A value already resolved from whatever host the operator works in.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Skyline(Skyline),
    SkylinePair(SkylinePair),
    OffsetPairs(Vec<[Point; 2]>),
    Other { type_name: String },
}

impl DecodedValue {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Skyline(_) => "skyline",
            Self::SkylinePair(_) => "skyline pair",
            Self::OffsetPairs(_) => "segment list",
            Self::Other { type_name } => type_name,
        }
    }
}

/// Resolves an operator expression to a decoded value.
pub trait ValueDecoder {
    fn decode(&self, expression: &str) -> Result<DecodedValue>;
}

/// Reads values from JSON files; the expression is the file path.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValueDecoder;

impl ValueDecoder for JsonValueDecoder {
    fn decode(&self, expression: &str) -> Result<DecodedValue> {
        let path = Path::new(expression);
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read value file {}", path.display()))?;
        decode_json(&text).with_context(|| format!("decode value file {}", path.display()))
    }
}

fn de_real<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RealWire {
        Number(f64),
        Text(String),
    }

    match RealWire::deserialize(deserializer)? {
        RealWire::Number(v) => Ok(v),
        RealWire::Text(text) => match text.trim() {
            "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
            "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or \"inf\"/\"-inf\", got {other:?}"
            ))),
        },
    }
}

#[derive(Deserialize)]
struct BuildingDoc {
    #[serde(deserialize_with = "de_real")]
    y_intercept: f64,
    #[serde(deserialize_with = "de_real")]
    slope: f64,
    #[serde(deserialize_with = "de_real")]
    start: f64,
    #[serde(deserialize_with = "de_real")]
    end: f64,
}

#[derive(Deserialize)]
struct SkylineDoc {
    sky: i64,
    #[serde(default)]
    buildings: Vec<BuildingDoc>,
}

impl SkylineDoc {
    fn into_skyline(self) -> Result<Skyline> {
        let sky = Direction::from_sign(self.sky)
            .ok_or_else(|| anyhow!("sky must be 1 or -1, got {}", self.sky))?;
        let buildings = self
            .buildings
            .into_iter()
            .map(|b| Building::new(b.y_intercept, b.slope, b.start, b.end))
            .collect();
        Ok(Skyline::new(sky, buildings))
    }
}

#[derive(Deserialize)]
struct PairDoc {
    skylines: Vec<SkylineDoc>,
}

#[derive(Deserialize)]
struct PointDoc(
    #[serde(deserialize_with = "de_real")] f64,
    #[serde(deserialize_with = "de_real")] f64,
);

#[derive(Deserialize)]
struct LinesDoc {
    lines: Vec<[PointDoc; 2]>,
}

/// Decodes `{"kind": ..., ...}`. Unknown kinds decode to [`DecodedValue::Other`].
pub fn decode_json(text: &str) -> Result<DecodedValue> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse JSON")?;
    let kind = value
        .get("kind")
        .and_then(|k| k.as_str())
        .ok_or_else(|| anyhow!("value has no \"kind\" field"))?
        .to_string();

    match kind.as_str() {
        "skyline" => {
            let doc: SkylineDoc = serde_json::from_value(value).context("decode skyline")?;
            Ok(DecodedValue::Skyline(doc.into_skyline()?))
        }
        "skyline_pair" => {
            let doc: PairDoc = serde_json::from_value(value).context("decode skyline pair")?;
            let count = doc.skylines.len();
            let skylines: [SkylineDoc; 2] = match doc.skylines.try_into() {
                Ok(skylines) => skylines,
                Err(_) => bail!("a skyline pair holds exactly two skylines, got {count}"),
            };
            let [first, second] = skylines;
            Ok(DecodedValue::SkylinePair(SkylinePair::new(
                first.into_skyline()?,
                second.into_skyline()?,
            )))
        }
        "lines" => {
            let doc: LinesDoc = serde_json::from_value(value).context("decode segment list")?;
            let pairs = doc
                .lines
                .into_iter()
                .map(|[a, b]| [Point::new(a.0, a.1), Point::new(b.0, b.1)])
                .collect();
            Ok(DecodedValue::OffsetPairs(pairs))
        }
        _ => Ok(DecodedValue::Other { type_name: kind }),
    }
}
