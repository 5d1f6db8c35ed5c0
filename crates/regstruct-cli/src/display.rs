//! Human-readable terminal output for store reads.
//!
//! Articles render as a vertical card grouped into sections; list-like
//! results (search hits, role requirements, counts) render as indented
//! listings capped at a fixed number of items.

use std::path::Path;

use regstruct_core::ActorType;
use regstruct_core::view::{ArticleView, RoleRequirement, SearchHit};
use regstruct_store::PopulateStats;

const MAX_LIST_ITEMS: usize = 10;
const MAX_LINE_CHARS: usize = 100;

// ── Public API ──

/// Print one article as a card: heading, location, paragraph tree, then
/// requirements, references and entities.
pub fn print_article(article: &ArticleView) {
    println!("=== Article {} ===", article.number);
    if !article.title.is_empty() {
        println!("{}", article.title);
    }
    println!();

    let has_location = article.chapter.is_some() || article.section.is_some();
    if has_location {
        println!("Location");
        if let Some(chapter) = &article.chapter {
            println!("  {:<26} {} {}", "chapter", chapter.number, chapter.title);
        }
        if let Some(section) = &article.section {
            println!("  {:<26} {} {}", "section", section.number, section.title);
        }
        println!();
    }

    if !article.paragraphs.is_empty() {
        println!("Paragraphs");
        for paragraph in &article.paragraphs {
            println!("  {}. {}", paragraph.number, truncate(&paragraph.text, MAX_LINE_CHARS));
            for sub in &paragraph.subparagraphs {
                println!("    ({}) {}", sub.letter, truncate(&sub.text, MAX_LINE_CHARS));
                for subsub in &sub.subsubparagraphs {
                    println!("      ({}) {}", subsub.number, truncate(&subsub.text, MAX_LINE_CHARS));
                }
            }
        }
        println!();
    }

    if !article.requirements.is_empty() {
        println!("Requirements ({})", article.requirements.len());
        for req in article.requirements.iter().take(MAX_LIST_ITEMS) {
            println!(
                "  [{}] {}",
                flags(req.is_obligation, req.is_right, req.is_time_requirement),
                truncate(&req.text, MAX_LINE_CHARS)
            );
        }
        print_overflow(article.requirements.len());
        println!();
    }

    if !article.cross_references.is_empty() {
        let refs: Vec<String> = article
            .cross_references
            .iter()
            .map(|r| match &r.paragraph {
                Some(p) => format!("{}({})", r.article, p),
                None => r.article.clone(),
            })
            .collect();
        println!("References");
        println!("  {:<26} {}", "articles", refs.join(", "));
        println!();
    }

    if !article.entities.is_empty() {
        println!("Entities ({})", article.entities.len());
        for entity in article.entities.iter().take(MAX_LIST_ITEMS) {
            println!("  {:<26} {}", entity.label, entity.text);
        }
        print_overflow(article.entities.len());
        println!();
    }
}

pub fn print_search_hits(keyword: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No articles mention '{keyword}'.");
        return;
    }
    println!("{} article(s) mention '{keyword}'", hits.len());
    println!();
    for hit in hits {
        println!("Article {}: {}", hit.article, hit.title);
        for m in hit.matches.iter().take(MAX_LIST_ITEMS) {
            println!("  {:>4}. {}", m.paragraph, m.snippet);
        }
        print_overflow(hit.matches.len());
    }
}

pub fn print_article_not_found(number: &str) {
    println!("{}", article_not_found(number));
}

/// Role names that are not an [`ActorType`] have no requirements.
pub fn print_unknown_role(role: &str) {
    println!("{}", no_requirements_for(&format!("role '{role}'")));
}

pub fn print_role_requirements(actor: ActorType, requirements: &[RoleRequirement]) {
    if requirements.is_empty() {
        println!("{}", no_requirements_for(&actor.phrase()));
        return;
    }
    println!("{} requirement(s) for {}", requirements.len(), actor.phrase());
    println!();
    let mut current: Option<&str> = None;
    for req in requirements {
        if current != Some(req.article.as_str()) {
            println!("Article {}: {}", req.article, req.article_title);
            current = Some(req.article.as_str());
        }
        println!(
            "  [{}] {}",
            flags(req.is_obligation, req.is_right, req.is_time_requirement),
            truncate(&req.text, MAX_LINE_CHARS)
        );
    }
}

pub fn print_table_counts(counts: &[(&str, usize)]) {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    for (table, n) in counts {
        println!("  {:<26} {:>8}", table, n);
    }
    println!("  {:<26} {:>8}", "total", total);
}

pub fn print_populate_stats(db: &Path, stats: &PopulateStats) {
    eprintln!("Populated {}", db.display());
    eprintln!("  {:<26} {:>8}", "chapters", stats.chapters);
    eprintln!("  {:<26} {:>8}", "sections", stats.sections);
    eprintln!("  {:<26} {:>8}", "recitals", stats.recitals);
    eprintln!("  {:<26} {:>8}", "articles", stats.articles);
    eprintln!("  {:<26} {:>8}", "paragraphs", stats.paragraphs);
    eprintln!("  {:<26} {:>8}", "requirements", stats.requirements);
    eprintln!("  {:<26} {:>8}", "definitions", stats.definitions);
    eprintln!("  {:<26} {:>8}", "cross references", stats.cross_references);
    eprintln!("  {:<26} {:>8}", "rows total", stats.total());
}

// ── Helpers ──

fn article_not_found(number: &str) -> String {
    format!("Article {number} not found.")
}

fn no_requirements_for(subject: &str) -> String {
    format!("No requirements found for {subject}.")
}

fn print_overflow(len: usize) {
    if len > MAX_LIST_ITEMS {
        println!("  ... and {} more", len - MAX_LIST_ITEMS);
    }
}

/// Compact O/R/T marker for requirement flags.
fn flags(obligation: bool, right: bool, time: bool) -> String {
    [(obligation, 'O'), (right, 'R'), (time, 'T')]
        .into_iter()
        .map(|(set, c)| if set { c } else { '-' })
        .collect()
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
