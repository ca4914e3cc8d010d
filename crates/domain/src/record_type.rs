use std::fmt;
use std::str::FromStr;

/// Query types the resolver cares to name in logs and metrics.
///
/// Anything else is carried as `Unknown` and forwarded untouched — the
/// resolver filters by name, never by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ptr,
    Srv,
    Soa,
    Ns,
    Https,
    Svcb,
    Unknown(u16),
}

impl RecordType {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            28 => RecordType::Aaaa,
            5 => RecordType::Cname,
            15 => RecordType::Mx,
            16 => RecordType::Txt,
            12 => RecordType::Ptr,
            33 => RecordType::Srv,
            6 => RecordType::Soa,
            2 => RecordType::Ns,
            65 => RecordType::Https,
            64 => RecordType::Svcb,
            other => RecordType::Unknown(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Aaaa => 28,
            RecordType::Cname => 5,
            RecordType::Mx => 15,
            RecordType::Txt => 16,
            RecordType::Ptr => 12,
            RecordType::Srv => 33,
            RecordType::Soa => 6,
            RecordType::Ns => 2,
            RecordType::Https => 65,
            RecordType::Svcb => 64,
            RecordType::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::Aaaa => f.write_str("AAAA"),
            RecordType::Cname => f.write_str("CNAME"),
            RecordType::Mx => f.write_str("MX"),
            RecordType::Txt => f.write_str("TXT"),
            RecordType::Ptr => f.write_str("PTR"),
            RecordType::Srv => f.write_str("SRV"),
            RecordType::Soa => f.write_str("SOA"),
            RecordType::Ns => f.write_str("NS"),
            RecordType::Https => f.write_str("HTTPS"),
            RecordType::Svcb => f.write_str("SVCB"),
            RecordType::Unknown(code) => write!(f, "TYPE{code}"),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "TXT" => Ok(RecordType::Txt),
            "PTR" => Ok(RecordType::Ptr),
            "SRV" => Ok(RecordType::Srv),
            "SOA" => Ok(RecordType::Soa),
            "NS" => Ok(RecordType::Ns),
            "HTTPS" => Ok(RecordType::Https),
            "SVCB" => Ok(RecordType::Svcb),
            other => {
                if let Some(code) = other.strip_prefix("TYPE") {
                    code.parse::<u16>()
                        .map(RecordType::Unknown)
                        .map_err(|_| format!("unknown record type: {other}"))
                } else {
                    Err(format!("unknown record type: {other}"))
                }
            }
        }
    }
}
