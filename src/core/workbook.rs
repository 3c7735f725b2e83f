//! The three stores addressed by [`StoreKind`].

use tracing::info;

use crate::{
    config::RsvpConfig,
    core::{
        schema::{self, Columns},
        sheet::{Cell, MemorySheet, Sheet},
    },
    error::RsvpResult,
    types::StoreKind,
};

/// Primary log, guest roster and dietary roster adapters.
pub struct Workbook {
    primary_log: Box<dyn Sheet>,
    guest_roster: Box<dyn Sheet>,
    dietary_roster: Box<dyn Sheet>,
}

impl Workbook {
    /// Wraps existing adapters.
    pub fn new(
        primary_log: Box<dyn Sheet>,
        guest_roster: Box<dyn Sheet>,
        dietary_roster: Box<dyn Sheet>,
    ) -> Self {
        Self {
            primary_log,
            guest_roster,
            dietary_roster,
        }
    }

    /// Three empty [`MemorySheet`]s named after `config`.
    pub fn in_memory(config: &RsvpConfig) -> Self {
        Self::new(
            Box::new(MemorySheet::new(config.primary_log.name.as_str())),
            Box::new(MemorySheet::new(config.guest_roster.name.as_str())),
            Box::new(MemorySheet::new(config.dietary_roster.name.as_str())),
        )
    }

    /// Adapter for `kind`.
    pub fn sheet(&self, kind: StoreKind) -> &dyn Sheet {
        match kind {
            StoreKind::PrimaryLog => self.primary_log.as_ref(),
            StoreKind::GuestRoster => self.guest_roster.as_ref(),
            StoreKind::DietaryRoster => self.dietary_roster.as_ref(),
        }
    }

    /// Mutable adapter for `kind`.
    pub fn sheet_mut(&mut self, kind: StoreKind) -> &mut dyn Sheet {
        match kind {
            StoreKind::PrimaryLog => self.primary_log.as_mut(),
            StoreKind::GuestRoster => self.guest_roster.as_mut(),
            StoreKind::DietaryRoster => self.dietary_roster.as_mut(),
        }
    }

    /// Rows of `kind` together with its resolved columns.
    pub fn load(&self, kind: StoreKind, config: &RsvpConfig) -> RsvpResult<(Vec<Vec<Cell>>, Columns)> {
        let sheet = self.sheet(kind);
        let rows = sheet.read_all()?;
        let cols = Columns::from_rows(sheet.name(), &rows, config.header_row);
        Ok((rows, cols))
    }

    /// Flushes every adapter.
    pub fn flush(&mut self) -> RsvpResult<()> {
        for kind in StoreKind::ALL {
            self.sheet_mut(kind).flush()?;
        }
        Ok(())
    }

    /// Writes missing header and caption rows. Returns the stores that were
    /// initialized.
    pub fn ensure_layout(&mut self, config: &RsvpConfig) -> RsvpResult<Vec<StoreKind>> {
        let mut initialized = Vec::new();
        for kind in StoreKind::ALL {
            let sheet = self.sheet_mut(kind);
            let rows = sheet.read_all()?;
            let header = rows.get(config.header_row);
            let expected = schema::headers_for(kind);
            let header_short = header.is_none_or(|cells| {
                cells.iter().filter(|c| !c.is_blank()).count() < expected.len()
            });
            if !header_short {
                continue;
            }

            sheet.write_row(config.header_row, &schema::header_cells(kind))?;
            let caption_blank = rows
                .get(config.caption_row)
                .is_none_or(|cells| cells.iter().all(Cell::is_blank));
            if caption_blank {
                sheet.write_row(
                    config.caption_row,
                    &[Cell::text(config.layout(kind).caption.as_str())],
                )?;
            }
            info!(store = %kind, sheet = sheet.name(), "initialized sheet layout");
            initialized.push(kind);
        }
        Ok(initialized)
    }
}
