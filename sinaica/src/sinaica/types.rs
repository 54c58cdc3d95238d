//! SINAICA response DTOs.
//!
//! These types map the upstream JSON by field name. The service is loose
//! about types: numbers often arrive as strings, and missing readings come
//! back as `null`, `""` or are left out entirely. Every field is therefore
//! optional and decoded leniently.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One record from the crude (automatic) data table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCrudeRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,

    /// Station id as the upstream spells it.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub estaciones_id: Option<i64>,

    /// Measurement date (YYYY-MM-DD).
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha: Option<String>,

    /// Hour of day, 0-23.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub hora: Option<i64>,

    /// Parameter code.
    #[serde(default, deserialize_with = "lenient_string")]
    pub parametro: Option<String>,

    /// Reading as first logged.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor_orig: Option<f64>,

    /// Instrument flags on the original reading.
    #[serde(default, deserialize_with = "lenient_string")]
    pub banderas_orig: Option<String>,

    /// Whether the original reading was valid (1) or not (0).
    #[serde(default, deserialize_with = "lenient_i64")]
    pub valido_orig: Option<i64>,

    /// Reading after any correction.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor_act: Option<f64>,

    /// Whether the current reading is valid (1) or not (0).
    #[serde(default, deserialize_with = "lenient_i64")]
    pub valido_act: Option<i64>,

    /// When the reading was last validated.
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_valido_act: Option<String>,

    /// Validation stage reached.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub nivel_validacion: Option<i64>,
}

/// One record from the manual data table.
///
/// Manual samples carry no "original" reading or flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawManualRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub estaciones_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha: Option<String>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub hora: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub parametro: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor_act: Option<f64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub valido_act: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub nivel_validacion: Option<i64>,
}

/// A parameter entry from the station metadata endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParam {
    /// Parameter code.
    #[serde(default, alias = "id", alias = "param", deserialize_with = "lenient_string")]
    pub parametro: Option<String>,

    /// Display name of the parameter.
    #[serde(default, alias = "name", deserialize_with = "lenient_string")]
    pub nombre: Option<String>,
}

/// First/last data dates from the station metadata endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDateLimits {
    #[serde(
        default,
        alias = "fechaMin",
        alias = "min",
        deserialize_with = "lenient_string"
    )]
    pub fecha_min: Option<String>,

    #[serde(
        default,
        alias = "fechaMax",
        alias = "max",
        deserialize_with = "lenient_string"
    )]
    pub fecha_max: Option<String>,
}

/// Date limits arrive either bare or wrapped in a one-element array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateLimitsResponse {
    List(Vec<RawDateLimits>),
    Single(RawDateLimits),
}

/// Decode a list response, treating an empty body or `null` as no records.
pub fn decode_list<T>(body: &str) -> Result<Vec<T>, serde_json::Error>
where
    T: for<'de> Deserialize<'de>,
{
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let records: Option<Vec<T>> = serde_json::from_str(body)?;
    Ok(records.unwrap_or_default())
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        Some(Value::Bool(b)) => Some(i64::from(b)),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crude_record_accepts_strings_and_numbers() {
        let json = r#"{
            "id": "4521",
            "estacionesId": 271,
            "fecha": "2015-10-14",
            "hora": "3",
            "parametro": "O3",
            "valorOrig": "0.034",
            "banderasOrig": "",
            "validoOrig": "1",
            "valorAct": 0.035,
            "validoAct": 1,
            "fechaValidoAct": null,
            "nivelValidacion": "0",
            "somethingNew": "ignored"
        }"#;

        let rec: RawCrudeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, Some(4521));
        assert_eq!(rec.estaciones_id, Some(271));
        assert_eq!(rec.fecha.as_deref(), Some("2015-10-14"));
        assert_eq!(rec.hora, Some(3));
        assert_eq!(rec.valor_orig, Some(0.034));
        assert_eq!(rec.banderas_orig, None);
        assert_eq!(rec.valido_orig, Some(1));
        assert_eq!(rec.valor_act, Some(0.035));
        assert_eq!(rec.fecha_valido_act, None);
        assert_eq!(rec.nivel_validacion, Some(0));
    }

    #[test]
    fn missing_and_garbage_fields_decode_to_none() {
        let rec: RawManualRecord =
            serde_json::from_str(r#"{"valorAct": "n/a", "validoAct": ""}"#).unwrap();
        assert_eq!(rec.valor_act, None);
        assert_eq!(rec.valido_act, None);
        assert_eq!(rec.id, None);
        assert_eq!(rec.parametro, None);
    }

    #[test]
    fn integral_floats_become_integers() {
        let rec: RawManualRecord =
            serde_json::from_str(r#"{"id": 12.0, "hora": "7.0", "validoAct": 0.5}"#).unwrap();
        assert_eq!(rec.id, Some(12));
        assert_eq!(rec.hora, Some(7));
        assert_eq!(rec.valido_act, None);
    }

    #[test]
    fn decode_list_handles_empty_payloads() {
        assert!(decode_list::<RawCrudeRecord>("").unwrap().is_empty());
        assert!(decode_list::<RawCrudeRecord>("  \n").unwrap().is_empty());
        assert!(decode_list::<RawCrudeRecord>("null").unwrap().is_empty());
        assert!(decode_list::<RawCrudeRecord>("[]").unwrap().is_empty());
        assert!(decode_list::<RawCrudeRecord>("{not json").is_err());
    }

    #[test]
    fn param_aliases() {
        let params: Vec<RawParam> =
            decode_list(r#"[{"id": "O3", "nombre": "Ozono"}, {"parametro": "CO", "name": "Monóxido de carbono"}]"#)
                .unwrap();
        assert_eq!(params[0].parametro.as_deref(), Some("O3"));
        assert_eq!(params[0].nombre.as_deref(), Some("Ozono"));
        assert_eq!(params[1].parametro.as_deref(), Some("CO"));
    }

    #[test]
    fn date_limits_bare_or_wrapped() {
        let wrapped: DateLimitsResponse =
            serde_json::from_str(r#"[{"fechaMin": "2017-01-01", "fechaMax": "2018-02-03"}]"#)
                .unwrap();
        assert!(matches!(wrapped, DateLimitsResponse::List(ref v) if v.len() == 1));

        let bare: DateLimitsResponse =
            serde_json::from_str(r#"{"min": "2017-01-01", "max": null}"#).unwrap();
        match bare {
            DateLimitsResponse::Single(l) => {
                assert_eq!(l.fecha_min.as_deref(), Some("2017-01-01"));
                assert_eq!(l.fecha_max, None);
            }
            other => panic!("expected single, got {other:?}"),
        }
    }
}
