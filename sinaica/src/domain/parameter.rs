//! Measured parameter codes.

use std::fmt;
use std::str::FromStr;

use super::error::InvalidArgument;

/// A pollutant or meteorological variable reported by SINAICA.
///
/// The set is closed: any code not listed here is rejected at parse time,
/// so a `Parameter` can always be rendered into an upstream query safely.
///
/// # Examples
///
/// ```
/// use sinaica::domain::Parameter;
///
/// let o3 = Parameter::parse("O3").unwrap();
/// assert_eq!(o3.as_str(), "O3");
/// assert_eq!(o3.unit(), "ppm");
///
/// // Codes are case-sensitive
/// assert!(Parameter::parse("o3").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Benzene
    Ben,
    /// Methane
    Ch4,
    /// Black carbon
    Cn,
    /// Carbon monoxide
    Co,
    /// Carbon dioxide
    Co2,
    /// Wind direction
    Dv,
    /// Hydrogen sulfide
    H2s,
    /// Non-methane hydrocarbons
    Hcnm,
    /// Total hydrocarbons
    Hct,
    /// Relative humidity
    Hr,
    /// Indoor relative humidity
    Hri,
    /// UV index
    Iuv,
    /// Nitric oxide
    No,
    /// Nitrogen dioxide
    No2,
    /// Nitrogen oxides
    Nox,
    /// Ozone
    O3,
    /// Lead
    Pb,
    /// Particulate matter under 10 µm
    Pm10,
    /// Particulate matter under 2.5 µm
    Pm25,
    /// Atmospheric pressure
    Pp,
    /// Total suspended particles
    Pst,
    /// Solar radiation
    Rs,
    /// Sulfur dioxide
    So2,
    /// Temperature
    Tmp,
    /// Indoor temperature
    Tmpi,
    /// UVA radiation
    Uva,
    /// UVB radiation
    Uvb,
    /// Wind speed
    Vv,
    /// Xylene
    Xil,
}

impl Parameter {
    /// Every parameter, in upstream code order.
    pub const ALL: [Parameter; 29] = [
        Parameter::Ben,
        Parameter::Ch4,
        Parameter::Cn,
        Parameter::Co,
        Parameter::Co2,
        Parameter::Dv,
        Parameter::H2s,
        Parameter::Hcnm,
        Parameter::Hct,
        Parameter::Hr,
        Parameter::Hri,
        Parameter::Iuv,
        Parameter::No,
        Parameter::No2,
        Parameter::Nox,
        Parameter::O3,
        Parameter::Pb,
        Parameter::Pm10,
        Parameter::Pm25,
        Parameter::Pp,
        Parameter::Pst,
        Parameter::Rs,
        Parameter::So2,
        Parameter::Tmp,
        Parameter::Tmpi,
        Parameter::Uva,
        Parameter::Uvb,
        Parameter::Vv,
        Parameter::Xil,
    ];

    /// Parse an upstream parameter code such as `"PM2.5"` or `"NOx"`.
    pub fn parse(s: &str) -> Result<Self, InvalidArgument> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| InvalidArgument::UnknownParameter(s.to_string()))
    }

    /// The code as SINAICA spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Ben => "BEN",
            Parameter::Ch4 => "CH4",
            Parameter::Cn => "CN",
            Parameter::Co => "CO",
            Parameter::Co2 => "CO2",
            Parameter::Dv => "DV",
            Parameter::H2s => "H2S",
            Parameter::Hcnm => "HCNM",
            Parameter::Hct => "HCT",
            Parameter::Hr => "HR",
            Parameter::Hri => "HRI",
            Parameter::Iuv => "IUV",
            Parameter::No => "NO",
            Parameter::No2 => "NO2",
            Parameter::Nox => "NOx",
            Parameter::O3 => "O3",
            Parameter::Pb => "PB",
            Parameter::Pm10 => "PM10",
            Parameter::Pm25 => "PM2.5",
            Parameter::Pp => "PP",
            Parameter::Pst => "PST",
            Parameter::Rs => "RS",
            Parameter::So2 => "SO2",
            Parameter::Tmp => "TMP",
            Parameter::Tmpi => "TMPI",
            Parameter::Uva => "UVA",
            Parameter::Uvb => "UVB",
            Parameter::Vv => "VV",
            Parameter::Xil => "XIL",
        }
    }

    /// Physical unit the upstream reports this parameter in.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Co
            | Parameter::Co2
            | Parameter::No
            | Parameter::No2
            | Parameter::Nox
            | Parameter::O3
            | Parameter::So2 => "ppm",
            Parameter::Cn
            | Parameter::Pb
            | Parameter::Pm10
            | Parameter::Pm25
            | Parameter::Pst => "µg/m³",
            Parameter::Ben
            | Parameter::Ch4
            | Parameter::H2s
            | Parameter::Hcnm
            | Parameter::Hct
            | Parameter::Xil => "ppb",
            Parameter::Tmp | Parameter::Tmpi => "°C",
            Parameter::Hr | Parameter::Hri => "%",
            Parameter::Vv => "m/s",
            Parameter::Dv => "°",
            Parameter::Pp => "mmHg",
            Parameter::Rs => "W/m²",
            Parameter::Iuv => "UV index",
            Parameter::Uva | Parameter::Uvb => "mW/m²",
        }
    }

    /// Upper limit above which a reading is treated as an extreme value.
    ///
    /// `None` means the parameter has no ceiling.
    pub fn ceiling(&self) -> Option<f64> {
        match self {
            Parameter::O3 => Some(0.2),
            Parameter::Pm10 => Some(600.0),
            Parameter::Pm25 => Some(175.0),
            Parameter::No2 => Some(0.21),
            Parameter::So2 => Some(0.2),
            Parameter::Co => Some(15.0),
            _ => None,
        }
    }
}

impl FromStr for Parameter {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Parameter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unit string for a raw parameter code, if the code is known.
pub fn unit_for_code(code: &str) -> Option<&'static str> {
    Parameter::parse(code).ok().map(|p| p.unit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_listed_code() {
        for code in [
            "BEN", "CH4", "CN", "CO", "CO2", "DV", "H2S", "HCNM", "HCT", "HR", "HRI", "IUV", "NO",
            "NO2", "NOx", "O3", "PB", "PM10", "PM2.5", "PP", "PST", "RS", "SO2", "TMP", "TMPI",
            "UVA", "UVB", "VV", "XIL",
        ] {
            let p = Parameter::parse(code).unwrap();
            assert_eq!(p.as_str(), code);
        }
    }

    #[test]
    fn reject_unknown_codes() {
        assert!(Parameter::parse("").is_err());
        assert!(Parameter::parse("PM25").is_err());
        assert!(Parameter::parse("NOX").is_err());
        assert!(Parameter::parse("o3").is_err());
        assert_eq!(
            Parameter::parse("XYZ"),
            Err(InvalidArgument::UnknownParameter("XYZ".into()))
        );
    }

    #[test]
    fn ceilings() {
        assert_eq!(Parameter::O3.ceiling(), Some(0.2));
        assert_eq!(Parameter::Pm10.ceiling(), Some(600.0));
        assert_eq!(Parameter::Pm25.ceiling(), Some(175.0));
        assert_eq!(Parameter::No2.ceiling(), Some(0.21));
        assert_eq!(Parameter::So2.ceiling(), Some(0.2));
        assert_eq!(Parameter::Co.ceiling(), Some(15.0));
        assert_eq!(Parameter::Tmp.ceiling(), None);
        assert_eq!(Parameter::Nox.ceiling(), None);
    }

    #[test]
    fn units() {
        assert_eq!(Parameter::O3.unit(), "ppm");
        assert_eq!(Parameter::Pm25.unit(), "µg/m³");
        assert_eq!(Parameter::Tmp.unit(), "°C");
        assert_eq!(unit_for_code("HR"), Some("%"));
        assert_eq!(unit_for_code("nope"), None);
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&Parameter::Pm25).unwrap();
        assert_eq!(json, "\"PM2.5\"");
    }

    #[test]
    fn from_str_matches_parse() {
        let p: Parameter = "NOx".parse().unwrap();
        assert_eq!(p, Parameter::Nox);
        assert_eq!(p.to_string(), "NOx");
    }
}
