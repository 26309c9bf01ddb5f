//! Headless run of a stack section over a synthetic page.
//!
//! Scrolls from the top of the page to the bottom in equal steps, sending
//! `burst` scroll events per step and then running one frame, and records
//! what the controller produced.

use std::io::Write;

use super::page::Page;
use super::section::StackSection;
use super::subscription::{Channel, ListenerRegistry};
use crate::core::card::CardDeck;
use crate::core::controller::{ControllerOptions, Effect};
use crate::core::transform::CardTransform;
use crate::error::{StackError, StackResult};

#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub scroll_offset: f64,
    pub progress: f64,
    pub active_index: Option<usize>,
    pub transforms: Vec<CardTransform>,
    pub effect: Effect,
}

pub fn simulate(
    deck: CardDeck,
    options: ControllerOptions,
    intersection_threshold: f64,
    viewport_height: f64,
    steps: usize,
    burst: usize,
) -> StackResult<Vec<FrameRecord>> {
    if steps == 0 {
        return Err(StackError::option("simulate", "needs at least one step"));
    }
    if !(viewport_height.is_finite() && viewport_height > 0.0) {
        return Err(StackError::option("viewport_height", "must be positive"));
    }

    let registry = ListenerRegistry::new();
    let mut page = Page::new(viewport_height, options.section_height_multiplier);
    let (mut section, _) = StackSection::mount(deck, options, intersection_threshold, &registry)?;

    let mut records = Vec::with_capacity(steps + 1);
    let record = |page: &Page, section: &StackSection, effect: Effect| FrameRecord {
        scroll_offset: page.scroll_offset(),
        progress: section.controller().progress(),
        active_index: section.controller().active_index(),
        transforms: section.transforms(),
        effect,
    };

    let effect = section.on_frame(&page);
    records.push(record(&page, &section, effect));

    let step = page.max_scroll() / steps as f64;
    for i in 1..=steps {
        let target = step * i as f64;
        let bursts = burst.max(1);
        let from = page.scroll_offset();
        for b in 1..=bursts {
            let moved = page.scroll_to(from + (target - from) * b as f64 / bursts as f64);
            if moved && registry.has_listeners(Channel::Scroll) {
                section.on_scroll();
            }
        }
        let effect = section.on_frame(&page);
        records.push(record(&page, &section, effect));
    }

    Ok(records)
}

pub fn print_report(records: &[FrameRecord], out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{:>8}  {:>8}  {:>6}  {:<14}  cards", "offset", "progress", "active", "effect")?;
    for r in records {
        let active = r
            .active_index
            .map_or_else(|| "-".to_string(), |i| i.to_string());
        let effect = match r.effect {
            Effect::Idle => "idle".to_string(),
            Effect::ScheduleFrame => "schedule".to_string(),
            Effect::Skipped => "skipped".to_string(),
            Effect::Recomputed { changed } => {
                format!("recomputed{}", if changed { "*" } else { "" })
            }
        };
        let cards: String = r
            .transforms
            .iter()
            .map(|t| if t.visible { '#' } else { '.' })
            .collect();
        writeln!(
            out,
            "{:>8.1}  {:>8.3}  {:>6}  {:<14}  {cards}",
            r.scroll_offset, r.progress, active, effect
        )?;
        for (i, t) in r.transforms.iter().enumerate().filter(|(_, t)| t.visible) {
            writeln!(out, "          card {i}: {t}")?;
        }
    }
    Ok(())
}
