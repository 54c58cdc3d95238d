//! Conversion from SINAICA DTOs to normalized tables.
//!
//! Handles column renaming, the station metadata join, unit recoding and
//! the outlier policy that produces the final `value` column.

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{DATE_FORMAT, Parameter, StationId, StationTable, unit_for_code};
use crate::table::{CrudeRow, DateLimits, ManualRow, ParamRow, Table};

use super::types::{DateLimitsResponse, RawCrudeRecord, RawManualRecord, RawParam};

/// Apply the outlier policy to one reading.
///
/// The reading is dropped when it is non-finite, flagged invalid (`valid == 0`)
/// or negative. With `remove_extremes`, it is also dropped above `ceiling`.
/// A missing validity flag does not count as invalid.
pub fn clean_value(
    value: Option<f64>,
    valid: Option<i64>,
    ceiling: Option<f64>,
    remove_extremes: bool,
) -> Option<f64> {
    let value = value.filter(|v| v.is_finite())?;

    if valid == Some(0) || value < 0.0 {
        return None;
    }

    match ceiling {
        Some(limit) if remove_extremes && value > limit => None,
        _ => Some(value),
    }
}

/// Metadata columns for one station, all missing when the station is unknown.
#[derive(Debug, Default)]
struct StationColumns {
    name: Option<String>,
    code: Option<String>,
    network_name: Option<String>,
    network_code: Option<String>,
    network_id: Option<u32>,
}

fn join_station(id: Option<StationId>, stations: &StationTable) -> StationColumns {
    match id.and_then(|id| stations.get(id)) {
        Some(meta) => StationColumns {
            name: Some(meta.name.clone()),
            code: Some(meta.code.clone()),
            network_name: Some(meta.network_name.clone()),
            network_code: Some(meta.network_code.clone()),
            network_id: Some(meta.network_id),
        },
        None => StationColumns::default(),
    }
}

fn station_id(raw: Option<i64>) -> Option<StationId> {
    raw.and_then(|id| u32::try_from(id).ok()).map(StationId)
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    // Dates sometimes carry a time component; only the day matters here.
    let day = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(day, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(date = raw, "unparseable date in SINAICA response");
            None
        }
    }
}

fn hour(raw: Option<i64>) -> Option<u8> {
    raw.and_then(|h| u8::try_from(h).ok())
}

fn ceiling_for(code: &str) -> Option<f64> {
    Parameter::parse(code).ok().and_then(|p| p.ceiling())
}

/// Normalize crude (automatic) records.
pub fn normalize_crude(
    records: Vec<RawCrudeRecord>,
    stations: &StationTable,
    remove_extremes: bool,
) -> Table<CrudeRow> {
    let rows = records
        .into_iter()
        .map(|rec| {
            let station_id = station_id(rec.estaciones_id);
            let meta = join_station(station_id, stations);
            let parameter = rec.parametro.unwrap_or_default();
            let value = clean_value(
                rec.valor_act,
                rec.valido_act,
                ceiling_for(&parameter),
                remove_extremes,
            );

            CrudeRow {
                id: rec.id,
                station_id,
                station_name: meta.name,
                station_code: meta.code,
                network_name: meta.network_name,
                network_code: meta.network_code,
                network_id: meta.network_id,
                date: parse_date(rec.fecha.as_deref()),
                hour: hour(rec.hora),
                unit: unit_for_code(&parameter),
                parameter,
                value_original: rec.valor_orig,
                flag_original: rec.banderas_orig,
                valid_original: rec.valido_orig,
                value_actual: rec.valor_act,
                valid_actual: rec.valido_act,
                date_validated: rec.fecha_valido_act,
                validation_level: rec.nivel_validacion,
                value,
            }
        })
        .collect();

    Table::new(rows)
}

/// Normalize manually collected records.
pub fn normalize_manual(
    records: Vec<RawManualRecord>,
    stations: &StationTable,
    remove_extremes: bool,
) -> Table<ManualRow> {
    let rows = records
        .into_iter()
        .map(|rec| {
            let station_id = station_id(rec.estaciones_id);
            let meta = join_station(station_id, stations);
            let parameter = rec.parametro.unwrap_or_default();
            let value = clean_value(
                rec.valor_act,
                rec.valido_act,
                ceiling_for(&parameter),
                remove_extremes,
            );

            ManualRow {
                id: rec.id,
                station_id,
                station_name: meta.name,
                station_code: meta.code,
                network_name: meta.network_name,
                network_code: meta.network_code,
                network_id: meta.network_id,
                date: parse_date(rec.fecha.as_deref()),
                hour: hour(rec.hora),
                unit: unit_for_code(&parameter),
                parameter,
                value_actual: rec.valor_act,
                valid_actual: rec.valido_act,
                validation_level: rec.nivel_validacion,
                value,
            }
        })
        .collect();

    Table::new(rows)
}

/// Normalize a station's parameter list, skipping entries without a code.
pub fn normalize_params(params: Vec<RawParam>) -> Table<ParamRow> {
    let rows = params
        .into_iter()
        .filter_map(|p| {
            let code = p.parametro?;
            Some(ParamRow {
                param_name: p.nombre.unwrap_or_else(|| code.clone()),
                param_code: code,
            })
        })
        .collect();

    Table::new(rows)
}

/// Normalize a date-limits response into a `[start, end]` pair.
pub fn normalize_date_limits(response: DateLimitsResponse) -> DateLimits {
    let raw = match response {
        DateLimitsResponse::Single(raw) => Some(raw),
        DateLimitsResponse::List(list) => list.into_iter().next(),
    };

    match raw {
        Some(raw) => DateLimits {
            start: parse_date(raw.fecha_min.as_deref()),
            end: parse_date(raw.fecha_max.as_deref()),
        },
        None => DateLimits::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationMeta;
    use crate::sinaica::types::{RawDateLimits, decode_list};
    use crate::table::Schema;

    fn stations() -> StationTable {
        [(
            StationId(271),
            StationMeta {
                name: "Merced".to_string(),
                code: "MER".to_string(),
                network_name: "Valle de México".to_string(),
                network_code: "VMX".to_string(),
                network_id: 30,
            },
        )]
        .into_iter()
        .collect()
    }

    fn crude(station: i64, parameter: &str, value: f64, valid: i64) -> RawCrudeRecord {
        RawCrudeRecord {
            id: Some(1),
            estaciones_id: Some(station),
            fecha: Some("2015-10-14".to_string()),
            hora: Some(5),
            parametro: Some(parameter.to_string()),
            valor_orig: Some(value),
            banderas_orig: None,
            valido_orig: Some(valid),
            valor_act: Some(value),
            valido_act: Some(valid),
            fecha_valido_act: None,
            nivel_validacion: Some(0),
        }
    }

    fn manual(station: i64, parameter: &str, value: f64, valid: i64) -> RawManualRecord {
        RawManualRecord {
            id: Some(9),
            estaciones_id: Some(station),
            fecha: Some("2017-01-03".to_string()),
            hora: Some(0),
            parametro: Some(parameter.to_string()),
            valor_act: Some(value),
            valido_act: Some(valid),
            nivel_validacion: Some(1),
        }
    }

    #[test]
    fn clean_value_policy() {
        assert_eq!(clean_value(Some(0.05), Some(1), Some(0.2), true), Some(0.05));
        assert_eq!(clean_value(Some(0.05), Some(0), Some(0.2), false), None);
        assert_eq!(clean_value(Some(-0.01), Some(1), None, false), None);
        assert_eq!(clean_value(Some(f64::NAN), Some(1), None, false), None);
        assert_eq!(clean_value(Some(f64::INFINITY), Some(1), None, false), None);
        assert_eq!(clean_value(None, Some(1), None, false), None);
        assert_eq!(clean_value(Some(0.3), None, Some(0.2), false), Some(0.3));
        assert_eq!(clean_value(Some(0.3), None, Some(0.2), true), None);
        assert_eq!(clean_value(Some(0.2), Some(1), Some(0.2), true), Some(0.2));
        assert_eq!(clean_value(Some(1e6), Some(1), None, true), Some(1e6));
        assert_eq!(clean_value(Some(0.0), Some(1), Some(0.2), true), Some(0.0));
    }

    #[test]
    fn crude_rows_join_station_and_unit() {
        let table = normalize_crude(vec![crude(271, "O3", 0.03, 1)], &stations(), false);
        let row = &table.rows()[0];

        assert_eq!(table.columns(), CrudeRow::COLUMNS);
        assert_eq!(row.station_id, Some(StationId(271)));
        assert_eq!(row.station_name.as_deref(), Some("Merced"));
        assert_eq!(row.station_code.as_deref(), Some("MER"));
        assert_eq!(row.network_code.as_deref(), Some("VMX"));
        assert_eq!(row.network_id, Some(30));
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2015, 10, 14));
        assert_eq!(row.hour, Some(5));
        assert_eq!(row.parameter, "O3");
        assert_eq!(row.unit, Some("ppm"));
        assert_eq!(row.value, Some(0.03));
    }

    #[test]
    fn unknown_station_keeps_row() {
        let table = normalize_crude(vec![crude(9999, "CO", 1.2, 1)], &stations(), false);
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.station_id, Some(StationId(9999)));
        assert_eq!(row.station_name, None);
        assert_eq!(row.network_id, None);
        assert_eq!(row.value, Some(1.2));
    }

    #[test]
    fn o3_extremes() {
        let records = vec![crude(271, "O3", 0.25, 1), crude(271, "O3", 0.15, 1)];

        let kept = normalize_crude(records.clone(), &stations(), false);
        assert_eq!(kept.rows()[0].value, Some(0.25));
        assert_eq!(kept.rows()[1].value, Some(0.15));

        let removed = normalize_crude(records, &stations(), true);
        assert_eq!(removed.rows()[0].value, None);
        assert_eq!(removed.rows()[0].value_actual, Some(0.25));
        assert_eq!(removed.rows()[1].value, Some(0.15));
    }

    #[test]
    fn invalid_and_negative_always_missing() {
        for remove_extremes in [false, true] {
            let table = normalize_crude(
                vec![crude(271, "TMP", 20.0, 0), crude(271, "TMP", -1.0, 1)],
                &stations(),
                remove_extremes,
            );
            assert_eq!(table.rows()[0].value, None);
            assert_eq!(table.rows()[1].value, None);
        }
    }

    #[test]
    fn manual_rows() {
        let table = normalize_manual(
            vec![manual(271, "PM10", 650.0, 1), manual(271, "PM10", 45.0, 1)],
            &stations(),
            true,
        );

        assert_eq!(table.columns(), ManualRow::COLUMNS);
        assert_eq!(table.rows()[0].value, None);
        assert_eq!(table.rows()[0].unit, Some("µg/m³"));
        assert_eq!(table.rows()[1].value, Some(45.0));
        assert_eq!(table.rows()[1].station_name.as_deref(), Some("Merced"));
    }

    #[test]
    fn empty_payloads_keep_schema() {
        let crude_table = normalize_crude(decode_list("[]").unwrap(), &stations(), true);
        assert!(crude_table.is_empty());
        assert_eq!(crude_table.columns().len(), 19);

        let manual_table = normalize_manual(decode_list("").unwrap(), &stations(), true);
        assert!(manual_table.is_empty());
        assert_eq!(manual_table.columns().len(), 15);
    }

    #[test]
    fn unknown_parameter_has_no_unit_or_ceiling() {
        let table = normalize_crude(vec![crude(271, "ZZZ", 1e9, 1)], &stations(), true);
        assert_eq!(table.rows()[0].unit, None);
        assert_eq!(table.rows()[0].value, Some(1e9));
    }

    #[test]
    fn dates_with_times_and_garbage() {
        let mut rec = crude(271, "O3", 0.01, 1);
        rec.fecha = Some("2015-10-14 00:00:00".to_string());
        rec.hora = Some(-1);
        let table = normalize_crude(vec![rec], &stations(), false);
        assert_eq!(table.rows()[0].date, NaiveDate::from_ymd_opt(2015, 10, 14));
        assert_eq!(table.rows()[0].hour, None);

        let mut rec = crude(271, "O3", 0.01, 1);
        rec.fecha = Some("0000-00-00".to_string());
        let table = normalize_crude(vec![rec], &stations(), false);
        assert_eq!(table.rows()[0].date, None);
    }

    #[test]
    fn params_skip_missing_codes() {
        let table = normalize_params(vec![
            RawParam {
                parametro: Some("O3".into()),
                nombre: Some("Ozono".into()),
            },
            RawParam {
                parametro: None,
                nombre: Some("orphan".into()),
            },
            RawParam {
                parametro: Some("PM10".into()),
                nombre: None,
            },
        ]);

        assert_eq!(table.columns(), ["param_code", "param_name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].param_name, "Ozono");
        assert_eq!(table.rows()[1].param_name, "PM10");
    }

    #[test]
    fn date_limits_shapes() {
        let limits = normalize_date_limits(DateLimitsResponse::List(vec![RawDateLimits {
            fecha_min: Some("1997-01-01".into()),
            fecha_max: Some("2018-05-31".into()),
        }]));
        assert_eq!(limits.start, NaiveDate::from_ymd_opt(1997, 1, 1));
        assert_eq!(limits.end, NaiveDate::from_ymd_opt(2018, 5, 31));

        let none = normalize_date_limits(DateLimitsResponse::List(Vec::new()));
        assert_eq!(none.as_pair(), [None, None]);

        let half = normalize_date_limits(DateLimitsResponse::Single(RawDateLimits::default()));
        assert_eq!(half.as_pair(), [None, None]);
    }
}
