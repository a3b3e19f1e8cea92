use clap::ValueEnum;
use index_md_indexer::EntryOrder;

use crate::config::SummarizerKind;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum SummarizerFlag {
    Excerpt,
    Llm,
}

impl SummarizerFlag {
    pub(crate) const fn as_domain(self) -> SummarizerKind {
        match self {
            SummarizerFlag::Excerpt => SummarizerKind::Excerpt,
            SummarizerFlag::Llm => SummarizerKind::Llm,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum OrderFlag {
    Name,
    DirsFirst,
    Native,
}

impl OrderFlag {
    pub(crate) const fn as_domain(self) -> EntryOrder {
        match self {
            OrderFlag::Name => EntryOrder::Name,
            OrderFlag::DirsFirst => EntryOrder::DirsFirst,
            OrderFlag::Native => EntryOrder::Native,
        }
    }
}
