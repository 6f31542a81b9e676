//! Timezone abbreviation table.
//!
//! Headline times in the archive carry abbreviations such as `EST` or `GMT`
//! that chrono cannot resolve on its own. [`TimezoneTable`] maps each
//! abbreviation to a fixed UTC offset in seconds.
//!
//! The process-wide table is built once from [`BUILTIN_TABLE`] and never
//! mutated; tests and callers that need a different mapping can build their
//! own with [`TimezoneTable::parse`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

/// One line per offset: `<offset_hours> <code> <code> ...`.
pub const BUILTIN_TABLE: &str = "\
-12 Y
-11 X NUT SST
-10 W CKT HAST HST TAHT TKT
-9.5 MART MIT
-9 V AKST GAMT GIT HADT HNY
-8 U AKDT CIST HAY HNP PST PT
-7 T HAP HNR MST PDT
-6 S CST EAST GALT HAR HNC MDT
-5 R CDT COT EASST ECT EST ET HAC HNE PET
-4.5 HLV VET
-4 Q AST BOT CLT COST EDT FKT GYT HAE HNA PYT
-3.5 HNT NST NT
-3 P ADT ART BRT CLST FKST GFT HAA PMST PYST SRT UYT WGT
-2.5 HAT NDT
-2 O BRST FNT PMDT UYST WGST
-1 N AZOT CVT EGT
0 Z EGST GMT UTC WET WT
1 A CET DFT WAT WEDT WEST
2 B CAT CEDT CEST EET SAST WAST
3 C EAT EEDT EEST IDT MSK
3.5 IRST
4 D AMT AZT GET GST KUYT MSD MUT RET SAMT SCT
4.5 AFT IRDT
5 E AMST AQTT AZST HMT MAWT MVT PKT TFT TJT TMT UZT YEKT
5.5 SLT IST
5.75 NPT
6 F ALMT BIOT BTT IOT KGT NOVT OMST YEKST
6.5 CCT MMT
7 G CXT DAVT HOVT ICT KRAT NOVST OMSST THA WIB
8 H ACT AWST BDT BNT CAST HKT IRKT KRAST MYT PHT SGT ULAT WITA WST
9 I AWDT IRKST JST KST PWT TLT WDT WIT YAKT
9.5 ACST
10 K AEST ChST PGT VLAT YAKST YAPT
10.5 ACDT LHST
11 L AEDT LHDT MAGT NCT PONT SBT VLAST VUT
11.5 NFT
12 M ANAST ANAT FJT GILT MAGST MHT NZST PETST PETT TVT WFT
12.75 CHAST
13 FJST NZDT
13.75 CHADT
14 LINT
";

static GLOBAL: Lazy<TimezoneTable> = Lazy::new(|| {
    TimezoneTable::parse(BUILTIN_TABLE).expect("built-in timezone table is well formed")
});

/// Errors raised while parsing a timezone table.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("line {line}: invalid offset {value:?}")]
    InvalidOffset { line: usize, value: String },
}

/// Immutable mapping from abbreviation to UTC offset in seconds.
#[derive(Debug, Clone, Default)]
pub struct TimezoneTable {
    offsets: HashMap<String, i32>,
}

impl TimezoneTable {
    /// Build a table from `<offset_hours> <code>...` lines.
    ///
    /// Offsets may be negative or fractional and are converted with
    /// `round(hours * 3600)`. Blank lines are ignored. When a code appears on
    /// several lines the last one wins.
    pub fn parse(lines: &str) -> Result<Self, TableError> {
        let mut offsets = HashMap::new();
        for (idx, line) in lines.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(hours) = fields.next() else {
                continue;
            };
            let hours: f64 = hours.parse().map_err(|_| TableError::InvalidOffset {
                line: idx + 1,
                value: hours.to_string(),
            })?;
            let seconds = (hours * 3600.0).round() as i32;
            for code in fields {
                offsets.insert(code.to_string(), seconds);
            }
        }
        Ok(Self { offsets })
    }

    /// The process-wide table built from [`BUILTIN_TABLE`].
    pub fn global() -> &'static TimezoneTable {
        &GLOBAL
    }

    /// Look up a code, trying the exact spelling before its uppercase form.
    pub fn lookup(&self, code: &str) -> Option<i32> {
        self.offsets
            .get(code)
            .or_else(|| self.offsets.get(&code.to_ascii_uppercase()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
