//! Minimal BIFF8 `.xls` writer for fixtures.
//!
//! Emits just enough records (globals, one worksheet, shared strings) for
//! calamine's `Xls` reader, wrapped in a compound file.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use tempfile::TempDir;

const RECORD_BOF: u16 = 0x0809;
const RECORD_EOF: u16 = 0x000A;
const RECORD_CODEPAGE: u16 = 0x0042;
const RECORD_WINDOW1: u16 = 0x003D;
const RECORD_WINDOW2: u16 = 0x023E;
const RECORD_FONT: u16 = 0x0031;
const RECORD_XF: u16 = 0x00E0;
const RECORD_BOUNDSHEET: u16 = 0x0085;
const RECORD_SST: u16 = 0x00FC;
const RECORD_DIMENSIONS: u16 = 0x0200;
const RECORD_LABELSST: u16 = 0x00FD;

const BIFF8: u16 = 0x0600;
const BOF_GLOBALS: u16 = 0x0005;
const BOF_WORKSHEET: u16 = 0x0010;
const CODEPAGE_UTF16: u16 = 1200;

/// First cell XF, after the 16 style XFs.
const XF_GENERAL: u16 = 16;

/// Write a single-sheet `.xls` holding text cells `"{prefix}{row}"` in
/// column A, rows numbered from 1. ASCII only.
pub fn write_xls(dir: &TempDir, name: &str, sheet_name: &str, prefix: &str, rows: u16) -> PathBuf {
    let strings: Vec<String> = (1..=rows).map(|row| format!("{prefix}{row}")).collect();
    let stream = workbook_stream(sheet_name, &strings);

    let mut ole = cfb::CompoundFile::create(Cursor::new(Vec::new())).expect("create cfb");
    {
        let mut workbook = ole.create_stream("Workbook").expect("Workbook stream");
        workbook.write_all(&stream).expect("write Workbook stream");
    }
    ole.flush().expect("flush cfb");

    let path = dir.path().join(name);
    std::fs::write(&path, ole.into_inner().into_inner()).expect("Failed to write xls fixture");
    path
}

fn workbook_stream(sheet_name: &str, strings: &[String]) -> Vec<u8> {
    let mut globals = Vec::new();
    push_record(&mut globals, RECORD_BOF, &bof(BOF_GLOBALS));
    push_record(&mut globals, RECORD_CODEPAGE, &CODEPAGE_UTF16.to_le_bytes());
    push_record(&mut globals, RECORD_WINDOW1, &window1());
    push_record(&mut globals, RECORD_FONT, &font("Arial"));
    for _ in 0..XF_GENERAL {
        push_record(&mut globals, RECORD_XF, &xf(true));
    }
    push_record(&mut globals, RECORD_XF, &xf(false));

    // lbPlyPos is patched once the globals length is known.
    let ply_pos = globals.len() + 4;
    let mut boundsheet = Vec::new();
    boundsheet.extend_from_slice(&0u32.to_le_bytes());
    boundsheet.extend_from_slice(&0u16.to_le_bytes());
    write_short_string(&mut boundsheet, sheet_name);
    push_record(&mut globals, RECORD_BOUNDSHEET, &boundsheet);

    push_record(&mut globals, RECORD_SST, &sst(strings));
    push_record(&mut globals, RECORD_EOF, &[]);

    let sheet_offset = globals.len() as u32;
    globals[ply_pos..ply_pos + 4].copy_from_slice(&sheet_offset.to_le_bytes());

    globals.extend_from_slice(&sheet_stream(strings.len()));
    globals
}

fn sheet_stream(rows: usize) -> Vec<u8> {
    let mut sheet = Vec::new();
    push_record(&mut sheet, RECORD_BOF, &bof(BOF_WORKSHEET));

    let mut dims = Vec::new();
    dims.extend_from_slice(&0u32.to_le_bytes());
    dims.extend_from_slice(&(rows as u32).to_le_bytes());
    dims.extend_from_slice(&0u16.to_le_bytes());
    dims.extend_from_slice(&1u16.to_le_bytes());
    dims.extend_from_slice(&0u16.to_le_bytes());
    push_record(&mut sheet, RECORD_DIMENSIONS, &dims);
    push_record(&mut sheet, RECORD_WINDOW2, &window2());

    for row in 0..rows {
        push_record(&mut sheet, RECORD_LABELSST, &label_sst(row as u16, 0, row as u32));
    }

    push_record(&mut sheet, RECORD_EOF, &[]);
    sheet
}

fn push_record(out: &mut Vec<u8>, id: u16, data: &[u8]) {
    out.extend_from_slice(&id.to_le_bytes());
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.extend_from_slice(data);
}

fn bof(dt: u16) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..2].copy_from_slice(&BIFF8.to_le_bytes());
    out[2..4].copy_from_slice(&dt.to_le_bytes());
    out[4..6].copy_from_slice(&0x0DBBu16.to_le_bytes());
    out[6..8].copy_from_slice(&0x07CCu16.to_le_bytes());
    out
}

fn window1() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[14..16].copy_from_slice(&1u16.to_le_bytes());
    out[16..18].copy_from_slice(&600u16.to_le_bytes());
    out
}

fn window2() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[0..2].copy_from_slice(&0x02B6u16.to_le_bytes());
    out
}

fn font(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&200u16.to_le_bytes()); // 10pt
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0x7FFFu16.to_le_bytes());
    out.extend_from_slice(&400u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&[0, 0, 0, 0]);
    write_short_string(&mut out, name);
    out
}

fn xf(style: bool) -> [u8; 20] {
    let mut out = [0u8; 20];
    let flags: u16 = 0x0001 | if style { 0x0004 } else { 0 };
    out[4..6].copy_from_slice(&flags.to_le_bytes());
    out[6] = 0x20;
    out[9] = 0x3F;
    out
}

fn sst(strings: &[String]) -> Vec<u8> {
    let count = strings.len() as u32;
    let mut out = Vec::new();
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    for s in strings {
        out.extend_from_slice(&(s.len() as u16).to_le_bytes());
        out.push(0); // 8-bit chars
        out.extend_from_slice(s.as_bytes());
    }
    out
}

fn label_sst(row: u16, col: u16, index: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    out[0..2].copy_from_slice(&row.to_le_bytes());
    out[2..4].copy_from_slice(&col.to_le_bytes());
    out[4..6].copy_from_slice(&XF_GENERAL.to_le_bytes());
    out[6..10].copy_from_slice(&index.to_le_bytes());
    out
}

fn write_short_string(out: &mut Vec<u8>, s: &str) {
    out.push(s.len() as u8);
    out.push(0);
    out.extend_from_slice(s.as_bytes());
}
