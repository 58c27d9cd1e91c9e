//! Traits at the seams between the container, the decoders and the front end.

use dwarfline_core::{DebugLocation, Endianness};

/// A named section of raw bytes.
pub trait Section {
    /// Section name.
    fn name(&self) -> &str;

    /// Virtual address where this section is loaded (0 for debug sections).
    fn virtual_address(&self) -> u64;

    /// Size in bytes.
    fn size(&self) -> u64;

    /// Raw section data.
    fn data(&self) -> &[u8];
}

/// Indexed access to the sections of a container.
///
/// This is all the DWARF reader needs from an object file, so anything that
/// can enumerate named byte ranges can be read.
pub trait SectionSource {
    /// Byte order of multi-byte fields in the sections.
    fn endianness(&self) -> Endianness;

    /// Number of sections.
    fn section_count(&self) -> usize;

    /// Returns the section at `index`, if any.
    fn section(&self, index: usize) -> Option<&dyn Section>;

    /// Returns the first section called `name`.
    fn section_named(&self, name: &str) -> Option<&dyn Section> {
        (0..self.section_count())
            .filter_map(|i| self.section(i))
            .find(|s| s.name() == name)
    }
}

/// Line-number queries offered to a debugger front end.
pub trait LineInfoProvider {
    /// Ingests the debug sections. Calling it again has no effect.
    fn read(&mut self);

    /// Resolves `address` to the source line covering it.
    fn debug_info(&self, address: u64) -> Option<DebugLocation>;

    /// Every address that starts a line-table row, in table then row order.
    fn executable_addresses(&self) -> Vec<u64>;

    /// The primary source file of each line table.
    fn source_files(&self) -> Vec<&str>;
}
