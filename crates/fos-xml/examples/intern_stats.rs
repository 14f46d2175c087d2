//! Example: feed element and attribute names through the parser cache
//!
//! Usage: `cargo run -p fos-xml --example intern_stats [FILE]`

use std::fs::File;
use std::sync::Arc;

use anyhow::Context;
use fos_xml::intern::CacheStats;
use fos_xml::{CharSource, PullParser, ReaderSource, StrSource};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"<?xml version="1.0"?>
<catalog>
  <book id="bk101" lang="en"><title>XML Developer's Guide</title><price>44.95</price></book>
  <book id="bk102" lang="en"><title>Midnight Rain</title><price>5.95</price></book>
  <book id="bk103" lang="fr"><title>Maeve Ascendant</title><price>5.95</price><note/></book>
</catalog>
"#;

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ':' | '-' | '_' | '.')
}

fn name_end(buf: &[char], start: usize) -> usize {
    buf[start..]
        .iter()
        .position(|&c| !is_name_char(c))
        .map_or(buf.len(), |n| start + n)
}

/// Minimal tag walker: reports names only, ignores text and values
fn walk<S: CharSource>(parser: &mut PullParser<S>) -> anyhow::Result<usize> {
    while parser.fill_buffer()? > 0 {}

    let buf: Vec<char> = parser.buffer().to_vec();
    let mut tags = 0;
    let mut i = 0;
    while i < buf.len() {
        if buf[i] != '<' || matches!(buf.get(i + 1), Some('?' | '!')) {
            i += 1;
            continue;
        }
        tags += 1;
        if buf.get(i + 1) == Some(&'/') {
            let end = name_end(&buf, i + 2);
            parser.pop_element(i + 2, end - i - 2)?;
            i = end;
            continue;
        }

        let (name_start, name_len) = (i + 1, name_end(&buf, i + 1) - i - 1);
        parser.push_element(name_start, name_len)?;
        i = name_start + name_len;
        let mut in_value = false;
        while i < buf.len() && (in_value || buf[i] != '>') {
            match buf[i] {
                '"' => in_value = !in_value,
                '/' if !in_value && buf.get(i + 1) == Some(&'>') => {
                    parser.pop_element(name_start, name_len)?;
                }
                c if !in_value && is_name_char(c) => {
                    let end = name_end(&buf, i);
                    parser.add_attribute(i, end - i)?;
                    i = end;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        i += 1;
    }
    Ok(tags)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let stats = Arc::new(CacheStats::new());

    let (tags, cached) = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            let mut parser = PullParser::new().with_metrics(stats.clone());
            parser.set_input(ReaderSource::new(file));
            (walk(&mut parser)?, parser.cache().len())
        }
        None => {
            let mut parser = PullParser::new().with_metrics(stats.clone());
            parser.set_input(StrSource::new(SAMPLE));
            (walk(&mut parser)?, parser.cache().len())
        }
    };

    println!("tags: {tags}");
    println!("distinct names: {cached}");
    println!("{}", stats.snapshot());
    Ok(())
}
