//! ELF (Executable and Linkable Format) container.
//!
//! Just enough of ELF to find sections by name and hand out their bytes:
//! the file header, the section header table and the section name string
//! table. Both 32-bit and 64-bit files in either byte order are accepted.

mod header;
mod section;

pub use header::{ElfClass, ElfHeader, ElfType, Machine, ELF_MAGIC};
pub use section::{
    ElfSection, SectionHeader, SHF_ALLOC, SHF_EXECINSTR, SHF_WRITE, SHT_NOBITS, SHT_NULL,
    SHT_PROGBITS, SHT_STRTAB, SHT_SYMTAB,
};

use crate::{ParseError, Section, SectionSource};
use dwarfline_core::{Architecture, Endianness};

/// A parsed ELF file borrowing its image.
#[derive(Debug)]
pub struct Elf<'a> {
    data: &'a [u8],
    /// Parsed ELF header.
    pub header: ElfHeader,
    sections: Vec<ElfSection<'a>>,
}

impl<'a> Elf<'a> {
    /// Parse an ELF file from raw bytes.
    pub fn parse(data: &'a [u8]) -> Result<Self, ParseError> {
        let header = ElfHeader::parse(data)?;
        let headers = Self::parse_section_headers(data, &header)?;

        let names = match headers.get(usize::from(header.e_shstrndx)) {
            Some(shstrtab) if header.e_shstrndx != 0 => StringTable::new(slice_of(data, shstrtab)),
            _ => StringTable::empty(),
        };

        let sections = headers
            .into_iter()
            .map(|h| {
                let name = names.get(h.sh_name as usize).unwrap_or("").to_string();
                let bytes = slice_of(data, &h);
                if bytes.is_empty() && h.file_range().is_some() {
                    tracing::warn!(section = %name, "section contents lie outside the file");
                }
                ElfSection::new(h, name, bytes)
            })
            .collect();

        Ok(Self {
            data,
            header,
            sections,
        })
    }

    fn parse_section_headers(
        data: &[u8],
        header: &ElfHeader,
    ) -> Result<Vec<SectionHeader>, ParseError> {
        if header.e_shoff == 0 || header.e_shnum == 0 {
            return Ok(Vec::new());
        }

        let entry_size = usize::from(header.e_shentsize);
        if entry_size < header.class.section_header_size() {
            return Err(ParseError::invalid_structure(
                "section header table",
                header.e_shoff,
                format!("entry size {} is too small", entry_size),
            ));
        }

        let table_start = usize::try_from(header.e_shoff)
            .map_err(|_| ParseError::Overflow { context: "section header offset" })?;
        let mut sections = Vec::with_capacity(usize::from(header.e_shnum));
        for i in 0..usize::from(header.e_shnum) {
            let offset = i
                .checked_mul(entry_size)
                .and_then(|o| o.checked_add(table_start))
                .ok_or(ParseError::Overflow { context: "section header table" })?;
            let end = offset.saturating_add(entry_size);
            if end > data.len() {
                return Err(ParseError::too_short(end, data.len()));
            }
            sections.push(SectionHeader::parse(
                &data[offset..end],
                header.class,
                header.endianness,
            )?);
        }

        Ok(sections)
    }

    /// Returns the raw file image.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the target architecture.
    pub fn architecture(&self) -> Architecture {
        self.header.architecture()
    }

    /// Returns the parsed sections in table order.
    pub fn sections(&self) -> &[ElfSection<'a>] {
        &self.sections
    }

    /// Returns the section with the given name.
    pub fn section_by_name(&self, name: &str) -> Option<&ElfSection<'a>> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Returns the contents of the named section.
    pub fn section_data(&self, name: &str) -> Option<&'a [u8]> {
        self.section_by_name(name)
            .map(|s| slice_of(self.data, &s.header))
    }
}

impl SectionSource for Elf<'_> {
    fn endianness(&self) -> Endianness {
        self.header.endianness
    }

    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section(&self, index: usize) -> Option<&dyn Section> {
        self.sections.get(index).map(|s| s as &dyn Section)
    }
}

/// File contents of a section, or an empty slice when it has none or its
/// range lies outside the image.
fn slice_of<'a>(data: &'a [u8], header: &SectionHeader) -> &'a [u8] {
    header
        .file_range()
        .and_then(|(start, end)| data.get(start..end))
        .unwrap_or(&[])
}

/// Null-terminated string table.
#[derive(Debug)]
struct StringTable<'a> {
    data: &'a [u8],
}

impl<'a> StringTable<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn empty() -> Self {
        Self { data: &[] }
    }

    fn get(&self, offset: usize) -> Option<&'a str> {
        let remaining = self.data.get(offset..)?;
        let end = remaining.iter().position(|&b| b == 0)?;
        std::str::from_utf8(&remaining[..end]).ok()
    }
}
