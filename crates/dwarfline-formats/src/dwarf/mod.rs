//! DWARF line-number information.
//!
//! Two sections are read:
//! - `.debug_line` - line number programs, decoded into [`LineTable`]s
//! - `.debug_aranges` - address range sets (informational only)
//!
//! Everything else in DWARF (`.debug_info`, `.debug_abbrev`, call frames) is
//! left alone; line tables alone are enough to map an address to a source
//! line.
//!
//! # Example
//!
//! ```ignore
//! use dwarfline_formats::dwarf::DwarfReader;
//! use dwarfline_formats::{Elf, LineInfoProvider};
//!
//! let elf = Elf::parse(&bytes)?;
//! let mut reader = DwarfReader::new(&elf);
//! reader.read();
//!
//! if let Some(loc) = reader.debug_info(0x4420) {
//!     println!("{}", loc);
//! }
//! ```

mod aranges;
mod config;
mod constants;
mod leb128;
mod line;
mod store;
mod warning;

pub use aranges::{
    decode_aranges, AddressRange, ArangeHeader, ArangeSet, ArangesSection, ARANGE_HEADER_SIZE,
};
pub use config::{ConstAddPc, DecoderConfig, FileAttribution};
pub use constants::{DwLne, DwLns, DW_LNS_EXTENDED};
pub use leb128::{decode_sleb128, decode_uleb128};
pub use line::{
    run_sequence, signed_line_base, LineEntry, LineProgramDecoder, LineProgramHeader,
    LineSection, LineState, LineTable, SourceFile, CURRENT_DIRECTORY,
};
pub use store::DebugLineStore;
pub use warning::{DecodeWarning, WarningKind};

use crate::{LineInfoProvider, SectionSource};
use dwarfline_core::DebugLocation;

/// Name of the line number program section.
pub const DEBUG_LINE: &str = ".debug_line";
/// Name of the address range section.
pub const DEBUG_ARANGES: &str = ".debug_aranges";

/// Line information for one binary.
///
/// Ingestion happens once, in [`read`](LineInfoProvider::read); queries
/// before that see an empty store.
#[derive(Debug)]
pub struct DwarfReader<'a, S: SectionSource + ?Sized> {
    source: &'a S,
    config: DecoderConfig,
    store: DebugLineStore,
    aranges: Vec<ArangeSet>,
    warnings: Vec<DecodeWarning>,
    loaded: bool,
}

impl<'a, S: SectionSource + ?Sized> DwarfReader<'a, S> {
    /// Create a reader with the default configuration.
    pub fn new(source: &'a S) -> Self {
        Self::with_config(source, DecoderConfig::default())
    }

    /// Create a reader with an explicit configuration.
    pub fn with_config(source: &'a S, config: DecoderConfig) -> Self {
        Self {
            source,
            config,
            store: DebugLineStore::new(),
            aranges: Vec::new(),
            warnings: Vec::new(),
            loaded: false,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Returns true once [`read`](LineInfoProvider::read) has run.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The decoded line tables.
    pub fn store(&self) -> &DebugLineStore {
        &self.store
    }

    /// The decoded address range sets.
    pub fn aranges(&self) -> &[ArangeSet] {
        &self.aranges
    }

    /// Units that failed to decode and other recorded limitations.
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    fn ingest(&mut self) {
        let endianness = self.source.endianness();
        let decoder = LineProgramDecoder::new(self.config);

        for index in 0..self.source.section_count() {
            let Some(section) = self.source.section(index) else {
                continue;
            };
            tracing::debug!(index, name = section.name(), "section");

            match section.name() {
                DEBUG_ARANGES => {
                    let decoded = decode_aranges(section.data(), endianness);
                    self.aranges.extend(decoded.sets);
                    self.warnings.extend(decoded.warnings);
                }
                DEBUG_LINE => {
                    let decoded = decoder.decode_section(section.data(), endianness);
                    self.store.extend(decoded.tables);
                    self.warnings.extend(decoded.warnings);
                }
                _ => {}
            }
        }

        tracing::debug!(
            tables = self.store.len(),
            rows = self.store.entry_count(),
            arange_sets = self.aranges.len(),
            warnings = self.warnings.len(),
            "line information loaded"
        );
    }
}

impl<S: SectionSource + ?Sized> LineInfoProvider for DwarfReader<'_, S> {
    fn read(&mut self) {
        if self.loaded {
            tracing::debug!("line information already loaded");
            return;
        }
        self.ingest();
        self.loaded = true;
    }

    fn debug_info(&self, address: u64) -> Option<DebugLocation> {
        self.store.lookup(address, self.config.file_attribution)
    }

    fn executable_addresses(&self) -> Vec<u64> {
        self.store.executable_addresses()
    }

    fn source_files(&self) -> Vec<&str> {
        self.store.source_files()
    }
}
