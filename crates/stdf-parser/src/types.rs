use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::lookup;

// === Error types ===

/// Errors that can occur while decoding an STDF stream.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Fewer bytes remained in the source than were requested.
    /// The stream processor treats this as a clean end of input.
    #[error("truncated stream")]
    TruncatedStream,

    /// A Pascal string's length byte points past the end of the body.
    #[error("malformed string: length {len} exceeds {available} remaining bytes")]
    MalformedString { len: usize, available: usize },

    /// A fixed-offset field lies past the end of the body.
    #[error("malformed record: needed {needed} bytes, {available} available")]
    MalformedRecord { needed: usize, available: usize },

    #[error("unsupported integer width: {0}")]
    UnsupportedWidth(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// === Header ===

/// Size of the fixed record header on the wire.
pub const HEADER_SIZE: usize = 4;

/// The four-byte header preceding every record body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Exact byte count of the body that follows.
    pub length: u16,
    pub major: u8,
    pub minor: u8,
}

impl RecordHeader {
    /// A zero-length header terminates the stream.
    pub fn is_end_of_stream(&self) -> bool {
        self.length == 0
    }
}

// === Field values ===

/// Seconds since the Unix epoch, as stored in STDF time fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch(pub u32);

impl Epoch {
    /// Converts to local civil time. Only meant for display.
    pub fn to_local(self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.0 as i64, 0).single()
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_local() {
            Some(t) => write!(f, "{}", t.format("%a %b %e %H:%M:%S %Y %:z")),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Unsigned(u64),
    Signed(i64),
    Char(char),
    Text(String),
    Timestamp(Epoch),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Unsigned(v) => write!(f, "{v}"),
            FieldValue::Signed(v) => write!(f, "{v}"),
            FieldValue::Char(c) => write!(f, "{c}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

/// A named field, in the positional order it was decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

impl Field {
    pub fn new(name: &'static str, value: FieldValue) -> Self {
        Field { name, value }
    }
}

/// Trailing Pascal-string fields, keyed by their fixed names.
///
/// Only the names that had bytes left to decode are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFields(pub Vec<(&'static str, String)>);

impl TextFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0
            .iter()
            .map(|(n, v)| Field::new(*n, FieldValue::Text(v.clone())))
    }
}

// === Record kinds ===

/// Every record kind the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Far,
    Atr,
    Mir,
    Mrr,
    Pcr,
    Hbr,
    Sbr,
    Pmr,
    Pgr,
    Plr,
    Rdr,
    Sdr,
    Wir,
    Wrr,
    Wcr,
    Pir,
    Prr,
    Tsr,
    Ptr,
    Mpr,
    Ftr,
    Bps,
    Eps,
    Gdr,
    Dtr,
    Reserved,
}

impl RecordKind {
    /// The three-letter mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            Self::Far => "FAR",
            Self::Atr => "ATR",
            Self::Mir => "MIR",
            Self::Mrr => "MRR",
            Self::Pcr => "PCR",
            Self::Hbr => "HBR",
            Self::Sbr => "SBR",
            Self::Pmr => "PMR",
            Self::Pgr => "PGR",
            Self::Plr => "PLR",
            Self::Rdr => "RDR",
            Self::Sdr => "SDR",
            Self::Wir => "WIR",
            Self::Wrr => "WRR",
            Self::Wcr => "WCR",
            Self::Pir => "PIR",
            Self::Prr => "PRR",
            Self::Tsr => "TSR",
            Self::Ptr => "PTR",
            Self::Mpr => "MPR",
            Self::Ftr => "FTR",
            Self::Bps => "BPS",
            Self::Eps => "EPS",
            Self::Gdr => "GDR",
            Self::Dtr => "DTR",
            Self::Reserved => "Reserved",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Far => "File Attributes Record",
            Self::Atr => "Audit Trail Record",
            Self::Mir => "Master Information Record",
            Self::Mrr => "Master Results Record",
            Self::Pcr => "Part Count Record",
            Self::Hbr => "Hardware Bin Record",
            Self::Sbr => "Software Bin Record",
            Self::Pmr => "Pin Map Record",
            Self::Pgr => "Pin Group Record",
            Self::Plr => "Pin List Record",
            Self::Rdr => "Retest Data Record",
            Self::Sdr => "Site Description Record",
            Self::Wir => "Wafer Information Record",
            Self::Wrr => "Wafer Results Record",
            Self::Wcr => "Wafer Configuration Record",
            Self::Pir => "Part Information Record",
            Self::Prr => "Part Results Record",
            Self::Tsr => "Test Synopsis Record",
            Self::Ptr => "Parametric Test Record",
            Self::Mpr => "Multiple-Result Parametric Record",
            Self::Ftr => "Functional Test Record",
            Self::Bps => "Begin Program Section Record",
            Self::Eps => "End Program Section Record",
            Self::Gdr => "Generic Data Record",
            Self::Dtr => "Datalog Text Record",
            Self::Reserved => "Reserved Record",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.name())
    }
}

// === Decoded records ===

/// File Attributes Record.
#[derive(Debug, Clone, PartialEq)]
pub struct Far {
    pub cpu_type: u8,
    pub stdf_ver: u8,
}

impl Far {
    pub fn cpu_type_name(&self) -> Option<&'static str> {
        lookup::CPU_TYPES.get(self.cpu_type).copied()
    }
}

/// Audit Trail Record.
#[derive(Debug, Clone, PartialEq)]
pub struct Atr {
    pub mod_tim: Epoch,
    pub cmd_line: String,
}

/// Master Information Record.
#[derive(Debug, Clone, PartialEq)]
pub struct Mir {
    pub setup_t: Epoch,
    pub start_t: Epoch,
    pub stat_num: u8,
    pub mode_cod: char,
    pub rtst_cod: char,
    pub prot_cod: char,
    pub burn_tim: u16,
    pub cmod_cod: char,
    pub text: TextFields,
}

impl Mir {
    /// Human-readable station mode, falling back to the raw code.
    pub fn mode_description(&self) -> String {
        match lookup::MODE_CODES.get(self.mode_cod) {
            Some(desc) => desc.to_string(),
            None => self.mode_cod.to_string(),
        }
    }
}

/// Site Description Record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sdr {
    pub head_num: u8,
    pub site_grp: u8,
    pub site_nums: Vec<u8>,
    pub text: TextFields,
}

/// Part Results Record.
#[derive(Debug, Clone, PartialEq)]
pub struct Prr {
    pub head_num: u8,
    pub site_grp: u8,
    pub part_flg: u8,
    pub num_test: u16,
    pub hard_bin: u16,
    pub soft_bin: u16,
    pub x_coord: i16,
    pub y_coord: i16,
    pub test_t: u32,
    pub part_id: Option<String>,
    pub part_txt: Option<String>,
    pub part_fix: Option<String>,
}

impl Prr {
    /// The part id used to key aggregated results. Empty when absent.
    pub fn id(&self) -> &str {
        self.part_id.as_deref().unwrap_or("")
    }
}

/// A decoded record body.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Far(Far),
    Atr(Atr),
    Mir(Mir),
    Sdr(Sdr),
    Prr(Prr),
    /// A recognized kind whose fields are intentionally not decoded.
    Unparsed(RecordKind),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Far(_) => RecordKind::Far,
            Record::Atr(_) => RecordKind::Atr,
            Record::Mir(_) => RecordKind::Mir,
            Record::Sdr(_) => RecordKind::Sdr,
            Record::Prr(_) => RecordKind::Prr,
            Record::Unparsed(kind) => *kind,
        }
    }

    /// The decoded fields in positional order.
    pub fn fields(&self) -> Vec<Field> {
        use FieldValue::*;
        match self {
            Record::Far(far) => vec![
                Field::new(
                    "CPU_TYPE",
                    Text(far.cpu_type_name().unwrap_or("Unknown").to_string()),
                ),
                Field::new("STDF_VER", Unsigned(far.stdf_ver as u64)),
            ],
            Record::Atr(atr) => vec![
                Field::new("MOD_TIM", Timestamp(atr.mod_tim)),
                Field::new("CMD_LINE", Text(atr.cmd_line.clone())),
            ],
            Record::Mir(mir) => {
                let mut fields = vec![
                    Field::new("SETUP_T", Timestamp(mir.setup_t)),
                    Field::new("START_T", Timestamp(mir.start_t)),
                    Field::new("STAT_NUM", Unsigned(mir.stat_num as u64)),
                    Field::new("MODE_COD", Text(mir.mode_description())),
                    Field::new("RTST_COD", Char(mir.rtst_cod)),
                    Field::new("PROT_COD", Char(mir.prot_cod)),
                    Field::new("BURN_TIM", Unsigned(mir.burn_tim as u64)),
                    Field::new("CMOD_COD", Char(mir.cmod_cod)),
                ];
                fields.extend(mir.text.to_fields());
                fields
            }
            Record::Sdr(sdr) => {
                let mut fields = vec![
                    Field::new("HEAD_NUM", Unsigned(sdr.head_num as u64)),
                    Field::new("SITE_GRP", Unsigned(sdr.site_grp as u64)),
                    Field::new("SITE_CNT", Unsigned(sdr.site_nums.len() as u64)),
                ];
                fields.extend(sdr.text.to_fields());
                fields
            }
            Record::Prr(prr) => {
                let mut fields = vec![
                    Field::new("HEAD_NUM", Unsigned(prr.head_num as u64)),
                    Field::new("SITE_GRP", Unsigned(prr.site_grp as u64)),
                    Field::new("PART_FLG", Unsigned(prr.part_flg as u64)),
                    Field::new("NUM_TEST", Unsigned(prr.num_test as u64)),
                    Field::new("HARD_BIN", Unsigned(prr.hard_bin as u64)),
                    Field::new("SOFT_BIN", Unsigned(prr.soft_bin as u64)),
                    Field::new("X_COORD", Signed(prr.x_coord as i64)),
                    Field::new("Y_COORD", Signed(prr.y_coord as i64)),
                    Field::new("TEST_T", Unsigned(prr.test_t as u64)),
                ];
                let text = [
                    ("PART_ID", &prr.part_id),
                    ("PART_TXT", &prr.part_txt),
                    ("PART_FIX", &prr.part_fix),
                ];
                for (name, value) in text {
                    if let Some(v) = value {
                        fields.push(Field::new(name, Text(v.clone())));
                    }
                }
                fields
            }
            Record::Unparsed(_) => vec![],
        }
    }
}

/// A record together with the header it was read under.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub header: RecordHeader,
    /// Absolute stream offset of the header.
    pub offset: u64,
    pub record: Record,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_stream_header() {
        let h = RecordHeader {
            length: 0,
            major: 5,
            minor: 20,
        };
        assert!(h.is_end_of_stream());
    }

    #[test]
    fn test_record_kind_display() {
        assert_eq!(RecordKind::Far.to_string(), "File Attributes Record (FAR)");
        assert_eq!(RecordKind::Prr.name(), "PRR");
    }

    #[test]
    fn test_prr_id_defaults_to_empty() {
        let prr = Prr {
            head_num: 1,
            site_grp: 1,
            part_flg: 0,
            num_test: 0,
            hard_bin: 0,
            soft_bin: 0,
            x_coord: 0,
            y_coord: 0,
            test_t: 0,
            part_id: None,
            part_txt: None,
            part_fix: None,
        };
        assert_eq!(prr.id(), "");
        let names: Vec<_> = Record::Prr(prr).fields().iter().map(|f| f.name).collect();
        assert_eq!(names.last(), Some(&"TEST_T"));
    }

    #[test]
    fn test_text_fields_get() {
        let t = TextFields(vec![("LOT_ID", "L1".to_string())]);
        assert_eq!(t.get("LOT_ID"), Some("L1"));
        assert_eq!(t.get("PART_TYP"), None);
        assert_eq!(t.len(), 1);
    }
}
