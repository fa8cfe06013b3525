//! Legacy Excel (`.xls`) encoding.
//!
//! Writes a minimal BIFF8 workbook with a single `Transactions` sheet and
//! stores it as the `Workbook` stream of an OLE2 compound file. The header
//! row uses a bold font, amounts are NUMBER cells, everything else is a
//! LABELSST cell pointing into the shared string table.

use std::{
    collections::HashMap,
    io::{Cursor, Write},
    mem,
};

use crate::{EngineError, ResultEngine};

use super::{ExportRow, HEADER};

const SHEET_NAME: &str = "Transactions";

/// Largest record body BIFF8 allows; longer data goes into CONTINUE records.
const MAX_RECORD_DATA: usize = 8224;

/// Option flags of an uncompressed (UTF-16LE) string.
const UNCOMPRESSED: u8 = 0x01;

pub(super) mod record {
    pub const BOF: u16 = 0x0809;
    pub const EOF: u16 = 0x000A;
    pub const CODEPAGE: u16 = 0x0042;
    pub const WINDOW1: u16 = 0x003D;
    pub const FONT: u16 = 0x0031;
    pub const XF: u16 = 0x00E0;
    pub const STYLE: u16 = 0x0293;
    pub const BOUNDSHEET: u16 = 0x0085;
    pub const SST: u16 = 0x00FC;
    pub const CONTINUE: u16 = 0x003C;
    pub const DIMENSIONS: u16 = 0x0200;
    pub const WINDOW2: u16 = 0x023E;
    pub const LABELSST: u16 = 0x00FD;
    pub const NUMBER: u16 = 0x0203;
}

const BOF_GLOBALS: u16 = 0x0005;
const BOF_WORKSHEET: u16 = 0x0010;

/// Index 4 is reserved in BIFF, so the fifth FONT record is font 5.
const FONT_BOLD: u16 = 5;
const XF_STYLE_COUNT: u16 = 15;
/// First cell XF, right after the style XFs.
const XF_NORMAL: u16 = XF_STYLE_COUNT;
const XF_BOLD: u16 = XF_STYLE_COUNT + 1;

const WEIGHT_NORMAL: u16 = 400;
const WEIGHT_BOLD: u16 = 700;

fn too_large(what: &str) -> EngineError {
    EngineError::Export(format!("{what} too large for xls"))
}

/// Unique cell strings in first-use order, plus the number of cells
/// referencing them.
#[derive(Default)]
struct SharedStrings {
    strings: Vec<String>,
    index: HashMap<String, u32>,
    references: u32,
}

impl SharedStrings {
    fn intern(&mut self, text: &str) -> ResultEngine<u32> {
        self.references = self
            .references
            .checked_add(1)
            .ok_or_else(|| too_large("string table"))?;
        if let Some(&index) = self.index.get(text) {
            return Ok(index);
        }
        let index = u32::try_from(self.strings.len()).map_err(|_| too_large("string table"))?;
        self.strings.push(text.to_string());
        self.index.insert(text.to_string(), index);
        Ok(index)
    }

    fn unique(&self) -> ResultEngine<u32> {
        u32::try_from(self.strings.len()).map_err(|_| too_large("string table"))
    }
}

#[derive(Default)]
struct Biff {
    buf: Vec<u8>,
}

impl Biff {
    fn record(&mut self, id: u16, data: &[u8]) -> ResultEngine<()> {
        if data.len() > MAX_RECORD_DATA {
            return Err(too_large("record"));
        }
        let len = u16::try_from(data.len()).map_err(|_| too_large("record"))?;
        self.buf.extend_from_slice(&id.to_le_bytes());
        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn bof(&mut self, substream: u16) -> ResultEngine<()> {
        let mut data = Vec::with_capacity(16);
        data.extend_from_slice(&0x0600u16.to_le_bytes());
        data.extend_from_slice(&substream.to_le_bytes());
        data.extend_from_slice(&0x0DBBu16.to_le_bytes());
        data.extend_from_slice(&0x07CCu16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&6u32.to_le_bytes());
        self.record(record::BOF, &data)
    }

    fn eof(&mut self) -> ResultEngine<()> {
        self.record(record::EOF, &[])
    }

    fn u16s(&mut self, id: u16, values: &[u16]) -> ResultEngine<()> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.record(id, &data)
    }

    fn font(&mut self, weight: u16) -> ResultEngine<()> {
        let mut data = Vec::with_capacity(21);
        for value in [200u16, 0, 0x7FFF, weight, 0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        // underline, family, charset, reserved
        data.extend_from_slice(&[0, 0, 0, 0]);
        short_string(&mut data, "Arial");
        self.record(record::FONT, &data)
    }

    fn xf(&mut self, font: u16, style: bool) -> ResultEngine<()> {
        let mut data = Vec::with_capacity(20);
        data.extend_from_slice(&font.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        let protection: u16 = if style { 0xFFF5 } else { 0x0001 };
        data.extend_from_slice(&protection.to_le_bytes());
        // bottom aligned, no rotation, no indent
        data.extend_from_slice(&[0x20, 0, 0]);
        data.push(if style { 0 } else { 0xF8 });
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0x20C0u16.to_le_bytes());
        self.record(record::XF, &data)
    }

    /// SST followed by as many CONTINUE records as the strings need.
    ///
    /// A string header (length and flags) never straddles two records.
    /// Character data may, in which case the CONTINUE record starts with the
    /// option flags again.
    fn sst(&mut self, table: &SharedStrings) -> ResultEngine<()> {
        let mut chunks: Vec<Vec<u8>> = Vec::new();
        let mut current = Vec::with_capacity(MAX_RECORD_DATA);
        current.extend_from_slice(&table.references.to_le_bytes());
        current.extend_from_slice(&table.unique()?.to_le_bytes());

        for text in &table.strings {
            let units: Vec<u16> = text.encode_utf16().collect();
            let count = u16::try_from(units.len()).map_err(|_| too_large("cell text"))?;
            if current.len() + 3 > MAX_RECORD_DATA {
                chunks.push(mem::take(&mut current));
            }
            current.extend_from_slice(&count.to_le_bytes());
            current.push(UNCOMPRESSED);

            let mut rest = units.as_slice();
            loop {
                let room = (MAX_RECORD_DATA - current.len()) / 2;
                let mut take = room.min(rest.len());
                // keep surrogate pairs in one record
                if take > 0 && take < rest.len() && (0xD800..0xDC00).contains(&rest[take - 1]) {
                    take -= 1;
                }
                let (now, later) = rest.split_at(take);
                current.extend(now.iter().flat_map(|unit| unit.to_le_bytes()));
                rest = later;
                if rest.is_empty() {
                    break;
                }
                chunks.push(mem::take(&mut current));
                current.push(UNCOMPRESSED);
            }
        }
        chunks.push(current);

        for (position, chunk) in chunks.iter().enumerate() {
            let id = if position == 0 {
                record::SST
            } else {
                record::CONTINUE
            };
            self.record(id, chunk)?;
        }
        Ok(())
    }

    fn label(&mut self, row: u16, col: u16, xf: u16, sst_index: u32) -> ResultEngine<()> {
        let mut data = cell_prefix(row, col, xf);
        data.extend_from_slice(&sst_index.to_le_bytes());
        self.record(record::LABELSST, &data)
    }

    fn number(&mut self, row: u16, col: u16, xf: u16, value: f64) -> ResultEngine<()> {
        let mut data = cell_prefix(row, col, xf);
        data.extend_from_slice(&value.to_le_bytes());
        self.record(record::NUMBER, &data)
    }
}

fn cell_prefix(row: u16, col: u16, xf: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(16);
    data.extend_from_slice(&row.to_le_bytes());
    data.extend_from_slice(&col.to_le_bytes());
    data.extend_from_slice(&xf.to_le_bytes());
    data
}

/// 8-bit length string, stored uncompressed only for non-Latin-1 input.
/// Used for font and sheet names only.
fn short_string(data: &mut Vec<u8>, text: &str) {
    let latin1 = text.chars().all(|c| (c as u32) < 0x100);
    let count = text.chars().count().min(u8::MAX as usize);
    data.push(count as u8);
    if latin1 {
        data.push(0x00);
        data.extend(text.chars().take(count).map(|c| c as u8));
    } else {
        data.push(UNCOMPRESSED);
        for unit in text.chars().take(count).collect::<String>().encode_utf16() {
            data.extend_from_slice(&unit.to_le_bytes());
        }
    }
}

/// Workbook globals and the position of the sheet offset inside BOUNDSHEET.
fn globals(table: &SharedStrings) -> ResultEngine<(Biff, usize)> {
    let mut biff = Biff::default();
    biff.bof(BOF_GLOBALS)?;
    // UTF-16
    biff.u16s(record::CODEPAGE, &[1200])?;
    biff.u16s(
        record::WINDOW1,
        &[0, 0, 0x3A5C, 0x23BE, 0x0038, 0, 0, 1, 0x0258],
    )?;
    for _ in 0..4 {
        biff.font(WEIGHT_NORMAL)?;
    }
    biff.font(WEIGHT_BOLD)?;
    for _ in 0..XF_STYLE_COUNT {
        biff.xf(0, true)?;
    }
    biff.xf(0, false)?;
    biff.xf(FONT_BOLD, false)?;
    biff.record(record::STYLE, &[0x00, 0x80, 0x00, 0xFF])?;

    let mut sheet = Vec::new();
    // patched once the globals length is known
    sheet.extend_from_slice(&0u32.to_le_bytes());
    sheet.extend_from_slice(&[0x00, 0x00]);
    short_string(&mut sheet, SHEET_NAME);
    let offset_position = biff.len() + 4;
    biff.record(record::BOUNDSHEET, &sheet)?;
    biff.sst(table)?;
    biff.eof()?;
    Ok((biff, offset_position))
}

fn worksheet(rows: &[ExportRow], table: &mut SharedStrings) -> ResultEngine<Biff> {
    // Row 0 is the header; BIFF8 rows are 16-bit.
    let last_row = u16::try_from(rows.len()).map_err(|_| too_large("row count"))?;
    let columns = u16::try_from(HEADER.len()).map_err(|_| too_large("column count"))?;

    let mut biff = Biff::default();
    biff.bof(BOF_WORKSHEET)?;

    let mut dimensions = Vec::with_capacity(14);
    dimensions.extend_from_slice(&0u32.to_le_bytes());
    dimensions.extend_from_slice(&(u32::from(last_row) + 1).to_le_bytes());
    dimensions.extend_from_slice(&0u16.to_le_bytes());
    dimensions.extend_from_slice(&columns.to_le_bytes());
    dimensions.extend_from_slice(&0u16.to_le_bytes());
    biff.record(record::DIMENSIONS, &dimensions)?;

    for (col, title) in (0u16..).zip(HEADER) {
        biff.label(0, col, XF_BOLD, table.intern(title)?)?;
    }

    for (r, row) in (1..=last_row).zip(rows) {
        biff.label(r, 0, XF_NORMAL, table.intern(&row.title)?)?;
        biff.label(r, 1, XF_NORMAL, table.intern(&row.description)?)?;
        biff.label(r, 2, XF_NORMAL, table.intern(&row.category)?)?;
        biff.number(r, 3, XF_NORMAL, row.amount.as_f64())?;
        biff.label(r, 4, XF_NORMAL, table.intern(&row.date)?)?;
    }

    biff.u16s(record::WINDOW2, &[0x06B6, 0, 0, 64, 0, 0, 0, 0, 0])?;
    biff.eof()?;
    Ok(biff)
}

/// Encode rows as an `.xls` workbook. The header row is always present and
/// cell text is kept in full.
pub fn to_xls(rows: &[ExportRow]) -> ResultEngine<Vec<u8>> {
    let mut table = SharedStrings::default();
    let sheet = worksheet(rows, &mut table)?;
    let (mut workbook, offset_position) = globals(&table)?;

    let sheet_offset = u32::try_from(workbook.len()).map_err(|_| too_large("workbook"))?;
    workbook.buf[offset_position..offset_position + 4]
        .copy_from_slice(&sheet_offset.to_le_bytes());
    workbook.buf.extend_from_slice(&sheet.buf);

    let io_err = |err: std::io::Error| EngineError::Export(err.to_string());
    let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).map_err(io_err)?;
    {
        let mut stream = compound.create_stream("/Workbook").map_err(io_err)?;
        stream.write_all(&workbook.buf).map_err(io_err)?;
        stream.flush().map_err(io_err)?;
    }
    compound.flush().map_err(io_err)?;
    Ok(compound.into_inner().into_inner())
}
