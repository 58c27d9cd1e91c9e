//! CLI integration tests for dwarfline.
//!
//! These tests write a small MSP430 ELF image with line tables to a
//! temporary directory and run the dwarfline binary against it.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Get the path to the dwarfline binary.
fn dwarfline_bin() -> String {
    env!("CARGO_BIN_EXE_dwarfline").to_string()
}

/// Write `bytes` to a per-test file in the temp directory.
fn write_fixture(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "dwarfline-cli-{}-{}.elf",
        std::process::id(),
        name
    ));
    fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Run dwarfline on the standard fixture with the given arguments.
fn run_dwarfline(name: &str, args: &[&str]) -> Output {
    let path = write_fixture(name, &fixture());
    let output = Command::new(dwarfline_bin())
        .arg(&path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute dwarfline");
    let _ = fs::remove_file(&path);
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Fixture
// =============================================================================

/// ELF32 little-endian MSP430 image with `.text`, `.debug_line`,
/// `.debug_aranges` and `.shstrtab`.
fn fixture() -> Vec<u8> {
    // Version 2 unit: min_inst 1, line_base -5, line_range 14, opcode_base 13.
    let mut prologue = vec![1, 1, 0xFB, 14, 13, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1];
    prologue.extend_from_slice(b"src\0\0");
    prologue.extend_from_slice(b"main.c\0\x01\0\0led.h\0\x01\0\0\0");
    let program = [
        0x00, 0x03, 0x02, 0x00, 0x44, // set_address 0x4400
        0x03, 0x09, 0x01, // line 10, copy
        75,   // 0x4404 line 11
        0x04, 0x02, 51, // file 2, 0x4406 line 16
        0x00, 0x01, 0x01,
    ];
    let mut body = 2u16.to_le_bytes().to_vec();
    body.extend_from_slice(&(prologue.len() as u32).to_le_bytes());
    body.extend_from_slice(&prologue);
    body.extend_from_slice(&program);
    let mut line = (body.len() as u32).to_le_bytes().to_vec();
    line.extend_from_slice(&body);

    let mut aranges = 16u32.to_le_bytes().to_vec();
    aranges.extend_from_slice(&[2, 0, 0, 0, 0, 0, 2, 0]);
    aranges.extend_from_slice(&[0x00, 0x44, 0x08, 0x00, 0, 0, 0, 0]);

    let text = vec![0x30, 0x41];
    let shstrtab = b"\0.text\0.debug_line\0.debug_aranges\0.shstrtab\0".to_vec();

    let mut image = vec![0u8; 52];
    image[0..4].copy_from_slice(&[0x7f, b'E', b'L', b'F']);
    image[4] = 1;
    image[5] = 1;
    image[6] = 1;
    image[16..18].copy_from_slice(&2u16.to_le_bytes());
    image[18..20].copy_from_slice(&105u16.to_le_bytes());

    let mut offsets = Vec::new();
    for data in [&text, &line, &aranges, &shstrtab] {
        offsets.push((image.len() as u32, data.len() as u32));
        image.extend_from_slice(data);
    }

    let shoff = image.len() as u32;
    let headers = [
        (0, 0, 0, 0, (0, 0)),
        (1, 1, 0x6, 0x4400, offsets[0]),
        (7, 1, 0, 0, offsets[1]),
        (19, 1, 0, 0, offsets[2]),
        (34, 3, 0, 0, offsets[3]),
    ];
    for (name, ty, flags, addr, (off, size)) in headers {
        for v in [name, ty, flags, addr, off, size, 0u32, 0, 1, 0] {
            image.extend_from_slice(&v.to_le_bytes());
        }
    }
    image[32..36].copy_from_slice(&shoff.to_le_bytes());
    image[46..48].copy_from_slice(&40u16.to_le_bytes());
    image[48..50].copy_from_slice(&5u16.to_le_bytes());
    image[50..52].copy_from_slice(&4u16.to_le_bytes());
    image
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help() {
    let output = Command::new(dwarfline_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute dwarfline");
    assert!(output.status.success(), "dwarfline --help should succeed");
    let stdout = stdout(&output);
    assert!(stdout.contains("source lines"), "Help should describe the tool");
    assert!(stdout.contains("lookup"), "Help should list the lookup command");
}

#[test]
fn test_missing_file() {
    let output = Command::new(dwarfline_bin())
        .arg("/nonexistent/dwarfline-fixture.elf")
        .output()
        .expect("Failed to execute dwarfline");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read binary"), "stderr: {}", stderr);
}

#[test]
fn test_not_an_elf() {
    let path = write_fixture("not-elf", b"MZ this is not an ELF file");
    let output = Command::new(dwarfline_bin())
        .arg(&path)
        .output()
        .expect("Failed to execute dwarfline");
    let _ = fs::remove_file(&path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown binary format"), "stderr: {}", stderr);
}

#[test]
fn test_summary() {
    let output = run_dwarfline("summary", &[]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("msp430 (32-bit ELF)"), "stdout: {}", stdout);
    assert!(stdout.contains("Line tables:   1"), "stdout: {}", stdout);
    assert!(stdout.contains("Line entries:  3"), "stdout: {}", stdout);
    assert!(stdout.contains("Warnings:      0"), "stdout: {}", stdout);
}

// =============================================================================
// Section and Table Listings
// =============================================================================

#[test]
fn test_sections() {
    let output = run_dwarfline("sections", &["sections"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains(".debug_line"));
    assert!(stdout.contains(".debug_aranges"));
    assert!(stdout.contains("A-X"), ".text should be alloc+exec");
}

#[test]
fn test_lines() {
    let output = run_dwarfline("lines", &["lines"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("src/main.c"));
    assert!(stdout.contains("0x00004400"));
    assert!(stdout.contains("0x00004406"));
    assert!(!stdout.contains("line 16"), "rows only with --entries");
}

#[test]
fn test_lines_with_entries() {
    let output = run_dwarfline("lines-entries", &["lines", "--entries", "--per-entry-files"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("line 16"));
    assert!(stdout.contains("src/led.h"));
}

#[test]
fn test_addresses() {
    let output = run_dwarfline("addresses", &["addresses"]);
    assert!(output.status.success());
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines, vec!["0x4400", "0x4404", "0x4406"]);
}

#[test]
fn test_files() {
    let output = run_dwarfline("files", &["files"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "src/main.c");
}

#[test]
fn test_aranges() {
    let output = run_dwarfline("aranges", &["aranges"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("address size 2"), "stdout: {}", stdout);
    assert!(stdout.contains("0x4400 - 0x4408"), "stdout: {}", stdout);
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_lookup_hit() {
    let output = run_dwarfline("lookup-hit", &["lookup", "0x4405"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0x4405: src/main.c:11");
}

#[test]
fn test_lookup_per_entry_file() {
    let output = run_dwarfline("lookup-per-entry", &["lookup", "4406", "--per-entry-files"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0x4406: src/led.h:16");
}

#[test]
fn test_lookup_miss() {
    let output = run_dwarfline("lookup-miss", &["lookup", "0x4407"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0x4407: no line information");
}

#[test]
fn test_lookup_rejects_bad_address() {
    let output = run_dwarfline("lookup-bad", &["lookup", "not-hex"]);
    assert!(!output.status.success());
}
