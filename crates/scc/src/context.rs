//! The CEA-608 decoding state machine.
//!
//! Two fixed 15×32 grids model the display and non-display memories. Codes
//! move a cursor and a pen over the active write buffer; EOC flips the
//! buffers, EDM erases the display, CR rolls it up. Whenever the visible
//! grid is replaced, the outgoing content is closed as a paragraph at the
//! event time code and the incoming content opens a new one.

use log::{debug, warn};

use model::timecode::SmpteTimeCode;
use model::{Document, Error, NodeId};

use crate::codes::attribute::SccAttributeCode;
use crate::codes::control::SccControlCode;
use crate::codes::mid_row::SccMidRowCode;
use crate::codes::pac::SccPreambleAddressCode;
use crate::codes::SccChannel;
use crate::config::TextAlignment;
use crate::grid::{Cell, Grid, Pen, GRID_COLS, GRID_ROWS};
use crate::paragraph;

/// The caption display style currently driving the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptionMode {
    Unknown,
    PopOn,
    PaintOn,
    RollUp,
}

pub(crate) struct SccContext<'a> {
    doc: &'a mut Document,
    div: NodeId,
    region_id: String,
    text_alignment: TextAlignment,

    mode: CaptionMode,
    roll_up_depth: usize,

    display: Grid,
    non_display: Grid,
    cursor: (usize, usize),
    pen: Pen,

    /// Begin time of the caption currently on display.
    open_begin: Option<SmpteTimeCode>,
    /// First-write time of the pop-on buffer, for end-of-stream salvage.
    buffered_begin: Option<SmpteTimeCode>,

    count: usize,
    pub(crate) current_channel: SccChannel,
}

impl<'a> SccContext<'a> {
    pub fn new(
        doc: &'a mut Document,
        div: NodeId,
        region_id: String,
        text_alignment: TextAlignment,
    ) -> Self {
        Self {
            doc,
            div,
            region_id,
            text_alignment,
            mode: CaptionMode::Unknown,
            roll_up_depth: 0,
            display: Grid::new(),
            non_display: Grid::new(),
            cursor: (0, 0),
            pen: Pen::default(),
            open_begin: None,
            buffered_begin: None,
            count: 0,
            current_channel: SccChannel::One,
        }
    }

    fn active_grid(&mut self) -> &mut Grid {
        match self.mode {
            CaptionMode::PopOn => &mut self.non_display,
            _ => &mut self.display,
        }
    }

    /// Closes the caption on display, if any, emitting it with the given
    /// end time. The display grid itself is left untouched.
    fn close_displayed(&mut self, end: Option<&SmpteTimeCode>) -> Result<(), Error> {
        let Some(begin) = self.open_begin.take() else {
            return Ok(());
        };
        if self.display.is_empty() {
            return Ok(());
        }
        // zero-length captions are dropped
        if let Some(end) = end {
            if end.to_frames() <= begin.to_frames() {
                return Ok(());
            }
        }
        self.count += 1;
        paragraph::push_caption(
            self.doc,
            self.div,
            &self.region_id,
            &self.display,
            &begin,
            end,
            self.count,
            self.text_alignment,
        )
    }

    pub fn handle_control(
        &mut self,
        code: SccControlCode,
        time_code: &SmpteTimeCode,
    ) -> Result<(), Error> {
        match code {
            SccControlCode::Rcl => {
                self.mode = CaptionMode::PopOn;
                self.non_display.clear();
                self.buffered_begin = None;
            }

            SccControlCode::Rdc => {
                self.mode = CaptionMode::PaintOn;
            }

            SccControlCode::Ru2 | SccControlCode::Ru3 | SccControlCode::Ru4 => {
                let depth = match code {
                    SccControlCode::Ru2 => 2,
                    SccControlCode::Ru3 => 3,
                    _ => 4,
                };
                if self.mode != CaptionMode::RollUp {
                    self.close_displayed(Some(time_code))?;
                    self.display.clear();
                }
                self.mode = CaptionMode::RollUp;
                self.roll_up_depth = depth;
                self.cursor = (GRID_ROWS - 1, 0);
            }

            SccControlCode::Eoc => {
                self.close_displayed(Some(time_code))?;
                std::mem::swap(&mut self.display, &mut self.non_display);
                self.open_begin = Some(time_code.clone());
                self.buffered_begin = None;
            }

            SccControlCode::Edm => {
                self.close_displayed(Some(time_code))?;
                self.display.clear();
            }

            SccControlCode::Enm => {
                self.non_display.clear();
                self.buffered_begin = None;
            }

            SccControlCode::Cr => {
                if self.mode != CaptionMode::RollUp {
                    warn!("carriage return outside roll-up mode, erasing display");
                    self.close_displayed(Some(time_code))?;
                    self.display.clear();
                    return Ok(());
                }
                self.close_displayed(Some(time_code))?;
                self.display.roll_up(GRID_ROWS.saturating_sub(self.roll_up_depth));
                self.open_begin =
                    (!self.display.is_empty()).then(|| time_code.clone());
                self.cursor = (GRID_ROWS - 1, 0);
            }

            SccControlCode::To1 => self.tab_offset(1),
            SccControlCode::To2 => self.tab_offset(2),
            SccControlCode::To3 => self.tab_offset(3),

            SccControlCode::Bs => self.backspace(),

            SccControlCode::Der => {
                let (row, col) = self.cursor;
                self.active_grid().erase_to_end_of_row(row, col);
            }

            SccControlCode::Fon
            | SccControlCode::Rtd
            | SccControlCode::Tr
            | SccControlCode::Aof
            | SccControlCode::Aon => {
                debug!("ignoring control code {}", code.name());
            }
        }
        Ok(())
    }

    fn tab_offset(&mut self, count: usize) {
        self.cursor.1 = (self.cursor.1 + count).min(GRID_COLS - 1);
    }

    pub fn backspace(&mut self) {
        if self.cursor.1 == 0 {
            return;
        }
        self.cursor.1 -= 1;
        let (row, col) = self.cursor;
        self.active_grid().erase(row, col);
    }

    pub fn handle_pac(&mut self, pac: SccPreambleAddressCode, _time_code: &SmpteTimeCode) {
        match self.mode {
            CaptionMode::RollUp => {
                // row and column from the PAC are ignored: roll-up text
                // always enters at the bottom row, column 0
                self.cursor = (GRID_ROWS - 1, 0);
            }
            CaptionMode::PopOn | CaptionMode::PaintOn => {
                let row = usize::from(pac.row().clamp(1, GRID_ROWS as u8)) - 1;
                let col = usize::from(pac.indent().unwrap_or(0)).min(GRID_COLS - 1);
                self.cursor = (row, col);
            }
            CaptionMode::Unknown => {
                warn!("preamble address code before any caption mode");
                return;
            }
        }

        self.pen = Pen {
            color: pac.color(),
            background: None,
            italic: pac.font_style().is_some(),
            underline: pac.text_decoration().is_some(),
        };
    }

    pub fn handle_mid_row(&mut self, code: SccMidRowCode, _time_code: &SmpteTimeCode) {
        if let Some(color) = code.color() {
            self.pen.color = Some(color);
            self.pen.italic = false;
        }
        if code.font_style().is_some() {
            self.pen.italic = true;
        }
        self.pen.underline = code.text_decoration().is_some();

        // a mid-row code occupies one cell, rendered as a styled space
        self.write_char(' ', None);
    }

    pub fn handle_attribute(&mut self, code: SccAttributeCode) {
        if code.is_background() {
            self.pen.background = Some(code.color());
        } else {
            self.pen.color = Some(code.color());
            self.pen.underline = code.text_decoration().is_some();
        }
    }

    pub fn write_text(&mut self, text: &str, time_code: &SmpteTimeCode) {
        for c in text.chars() {
            self.write_char(c, Some(time_code));
        }
    }

    fn write_char(&mut self, c: char, time_code: Option<&SmpteTimeCode>) {
        if self.mode == CaptionMode::Unknown {
            warn!("dropping text received before any caption mode");
            return;
        }

        if let Some(tc) = time_code {
            match self.mode {
                CaptionMode::PopOn => {
                    if self.buffered_begin.is_none() {
                        self.buffered_begin = Some(tc.clone());
                    }
                }
                _ => {
                    if self.open_begin.is_none() {
                        self.open_begin = Some(tc.clone());
                    }
                }
            }
        }

        let (row, col) = self.cursor;
        let pen = self.pen;
        self.active_grid().set(row, col, Cell { ch: c, pen });
        if self.cursor.1 < GRID_COLS - 1 {
            self.cursor.1 += 1;
        }
    }

    /// Closes any caption still visible at end of stream, and salvages a
    /// composed pop-on buffer that was never flipped on screen.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.close_displayed(None)?;

        if !self.non_display.is_empty() {
            if let Some(begin) = self.buffered_begin.take() {
                self.count += 1;
                paragraph::push_caption(
                    self.doc,
                    self.div,
                    &self.region_id,
                    &self.non_display,
                    &begin,
                    None,
                    self.count,
                    self.text_alignment,
                )?;
            }
        }
        Ok(())
    }
}
