//! Lazy, paced sequence of summary fragments.

use super::Fragment;
use super::pacer::Pacer;
use super::sections::{Piece, SummaryPlan};
use super::typewriter::{Tokens, Typewriter};
use crate::config::SummaryConfig;
use crate::table::Table;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;
use tracing::debug;

/// Iterator over the fragments of a dataset summary.
///
/// Sections are rendered only when the consumer reaches them; dropping
/// the stream early skips the remaining work and pauses.
#[derive(Debug)]
pub struct SummaryStream {
    table: Table,
    config: SummaryConfig,
    pacer: Arc<dyn Pacer>,
    plan: SummaryPlan,
    next_section: usize,
    pending: VecDeque<Piece>,
    current: Option<Tokens>,
}

impl SummaryStream {
    pub(crate) fn new(table: Table, config: SummaryConfig, pacer: Arc<dyn Pacer>) -> Self {
        let plan = SummaryPlan::for_table(&table);
        Self {
            table,
            config,
            pacer,
            plan,
            next_section: 0,
            pending: VecDeque::new(),
            current: None,
        }
    }

    /// Sections this stream will produce.
    pub fn plan(&self) -> &SummaryPlan {
        &self.plan
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    fn start_next_section(&mut self) -> bool {
        let Some(&section) = self.plan.sections().get(self.next_section) else {
            return false;
        };
        self.next_section += 1;
        debug!(?section, "Rendering summary section");
        self.pending.extend(section.render(&self.table, &self.config));
        true
    }

    /// Render everything to a single string.
    pub fn collect_text(self) -> String {
        self.map(|fragment| fragment.to_string()).collect()
    }
}

impl Iterator for SummaryStream {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        loop {
            if let Some(tokens) = self.current.as_mut() {
                if let Some(token) = tokens.next() {
                    return Some(Fragment::Token(token));
                }
                self.current = None;
            }

            match self.pending.pop_front() {
                Some(Piece::Line(text)) => {
                    let typewriter = Typewriter::with_pacer(
                        &text,
                        self.config.token_delay(),
                        Arc::clone(&self.pacer),
                    );
                    self.current = Some(typewriter.into_iter());
                }
                Some(Piece::Break) => return Some(Fragment::Token("\n".to_string())),
                Some(Piece::Table(table)) => return Some(Fragment::Table(table)),
                Some(Piece::Pause) => self.pacer.pause(self.config.section_pause()),
                None => {
                    if !self.start_next_section() {
                        return None;
                    }
                }
            }
        }
    }
}

impl FusedIterator for SummaryStream {}

static_assertions::assert_impl_all!(SummaryStream: Send);

