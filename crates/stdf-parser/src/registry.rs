use std::collections::HashMap;

use crate::parser;
use crate::types::{ParseError, Record, RecordKind};

/// A function decoding one record body.
pub type DecodeFn = fn(&[u8]) -> Result<Record, ParseError>;

/// What the registry holds for a known (major, minor) pair.
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    /// Decode the body into fields.
    Decode(RecordKind, DecodeFn),
    /// A known kind whose body is intentionally not decoded.
    Recognized(RecordKind),
}

impl Handler {
    pub fn kind(&self) -> RecordKind {
        match self {
            Handler::Decode(kind, _) | Handler::Recognized(kind) => *kind,
        }
    }
}

/// The result of looking up a record type.
#[derive(Debug)]
pub enum Dispatch<'a> {
    Handle(&'a Handler),
    /// The pair is not registered; skip the body without decoding.
    Skip,
}

/// Two-level mapping from (major, minor) record type to its handler.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    handlers: HashMap<u8, HashMap<u8, Handler>>,
}

impl Registry {
    /// An empty registry; every record is skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard STDF V4 record table.
    pub fn standard() -> Self {
        use RecordKind::*;

        let mut reg = Self::new();
        reg.register(0, 10, Handler::Decode(Far, parser::decode_far));
        reg.register(0, 20, Handler::Decode(Atr, parser::decode_atr));
        reg.register(1, 10, Handler::Decode(Mir, parser::decode_mir));
        reg.register(1, 80, Handler::Decode(Sdr, parser::decode_sdr));
        reg.register(5, 20, Handler::Decode(Prr, parser::decode_prr));

        let recognized = [
            (1, 20, Mrr),
            (1, 30, Pcr),
            (1, 40, Hbr),
            (1, 50, Sbr),
            (1, 60, Pmr),
            (1, 62, Pgr),
            (1, 63, Plr),
            (1, 70, Rdr),
            (2, 10, Wir),
            (2, 20, Wrr),
            (2, 30, Wcr),
            (5, 10, Pir),
            (10, 30, Tsr),
            (15, 10, Ptr),
            (15, 15, Mpr),
            (15, 20, Ftr),
            (20, 10, Bps),
            (20, 20, Eps),
            (50, 10, Gdr),
            (50, 30, Dtr),
            (180, 0, Reserved),
            (181, 0, Reserved),
        ];
        for (major, minor, kind) in recognized {
            reg.register(major, minor, Handler::Recognized(kind));
        }
        reg
    }

    /// Register a handler, replacing any previous one for the same pair.
    pub fn register(&mut self, major: u8, minor: u8, handler: Handler) {
        self.handlers
            .entry(major)
            .or_default()
            .insert(minor, handler);
    }

    pub fn lookup(&self, major: u8, minor: u8) -> Dispatch<'_> {
        match self.handlers.get(&major).and_then(|m| m.get(&minor)) {
            Some(handler) => Dispatch::Handle(handler),
            None => Dispatch::Skip,
        }
    }

    /// The kind registered for a pair, if any.
    pub fn kind(&self, major: u8, minor: u8) -> Option<RecordKind> {
        match self.lookup(major, minor) {
            Dispatch::Handle(handler) => Some(handler.kind()),
            Dispatch::Skip => None,
        }
    }

    /// Look up and run the handler for a record body.
    ///
    /// Returns `Ok(None)` for unregistered pairs.
    pub fn dispatch(&self, major: u8, minor: u8, body: &[u8]) -> Result<Option<Record>, ParseError> {
        match self.lookup(major, minor) {
            Dispatch::Handle(Handler::Decode(_, decode)) => decode(body).map(Some),
            Dispatch::Handle(Handler::Recognized(kind)) => Ok(Some(Record::Unparsed(*kind))),
            Dispatch::Skip => Ok(None),
        }
    }
}
