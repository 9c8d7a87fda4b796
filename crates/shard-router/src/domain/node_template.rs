//! # Node Templates
//!
//! Compact range expressions describing the full set of data nodes for a
//! logical table, e.g.:
//!
//! ```text
//! ds_0.orders_$->{2023..2023}_0$->{1..9},ds_0.orders_$->{2023..2023}_1$->{0..2}
//! ```
//!
//! Each comma-separated entry is `data_source.table_pattern`; a pattern may
//! contain any number of `$->{a..b}` segments, each an inclusive bounded
//! integer range, expanded as a cartesian product. Bounds written with
//! leading zeros keep their width (`$->{01..12}` yields `01`, `02`, ... `12`).

use super::errors::RoutingError;
use super::value_objects::DataNode;

/// Hard cap on expanded nodes per template, guarding runaway products.
pub const MAX_EXPANDED_NODES: usize = 8192;

const RANGE_OPEN: &str = "$->{";

/// A parsed, fully expanded node template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeTemplate {
    nodes: Vec<DataNode>,
}

impl NodeTemplate {
    /// Parse and expand a template expression. Fails with a configuration
    /// error on malformed syntax, empty expansion, or expansion past
    /// [`MAX_EXPANDED_NODES`].
    pub fn parse(expr: &str) -> Result<Self, RoutingError> {
        let mut nodes = Vec::new();
        for entry in expr.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(RoutingError::Configuration(format!(
                    "empty entry in node template '{expr}'"
                )));
            }
            let (data_source, pattern) = entry.split_once('.').ok_or_else(|| {
                RoutingError::Configuration(format!(
                    "node template entry '{entry}' must be 'data_source.table_pattern'"
                ))
            })?;
            if data_source.is_empty() || pattern.is_empty() {
                return Err(RoutingError::Configuration(format!(
                    "node template entry '{entry}' has an empty data source or table pattern"
                )));
            }
            validate_identifier(data_source)?;
            for table in expand_pattern(pattern)? {
                validate_identifier(&table)?;
                nodes.push(DataNode::new(data_source, table));
                if nodes.len() > MAX_EXPANDED_NODES {
                    return Err(RoutingError::Configuration(format!(
                        "node template '{expr}' expands past the {MAX_EXPANDED_NODES}-node cap"
                    )));
                }
            }
        }
        if nodes.is_empty() {
            return Err(RoutingError::Configuration(format!(
                "node template '{expr}' expands to no data nodes"
            )));
        }
        Ok(Self { nodes })
    }

    /// The expanded node set, in template order.
    pub fn nodes(&self) -> &[DataNode] {
        &self.nodes
    }

    /// Consume the template, yielding the expanded node set.
    pub fn into_nodes(self) -> Vec<DataNode> {
        self.nodes
    }

    /// Number of expanded nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the template expanded to no nodes (never true after `parse`).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Expand every `$->{a..b}` segment in `pattern`, left to right.
fn expand_pattern(pattern: &str) -> Result<Vec<String>, RoutingError> {
    let Some(open) = pattern.find(RANGE_OPEN) else {
        return Ok(vec![pattern.to_string()]);
    };
    let prefix = &pattern[..open];
    let rest = &pattern[open + RANGE_OPEN.len()..];
    let close = rest.find('}').ok_or_else(|| {
        RoutingError::Configuration(format!("unterminated range segment in '{pattern}'"))
    })?;
    let (lo_s, hi_s) = rest[..close].split_once("..").ok_or_else(|| {
        RoutingError::Configuration(format!(
            "range segment '{}' in '{pattern}' must be 'a..b'",
            &rest[..close]
        ))
    })?;
    let lo: u64 = parse_bound(lo_s, pattern)?;
    let hi: u64 = parse_bound(hi_s, pattern)?;
    if lo > hi {
        return Err(RoutingError::Configuration(format!(
            "descending range {lo}..{hi} in '{pattern}'"
        )));
    }
    let count = (hi - lo + 1) as usize;
    if count > MAX_EXPANDED_NODES {
        return Err(RoutingError::Configuration(format!(
            "range {lo}..{hi} in '{pattern}' expands past the {MAX_EXPANDED_NODES}-node cap"
        )));
    }
    // Leading zeros in the bounds fix the token width.
    let width = if lo_s.len() == hi_s.len() && lo_s.len() > 1 && lo_s.starts_with('0') {
        lo_s.len()
    } else {
        0
    };

    let tails = expand_pattern(&rest[close + 1..])?;
    let mut out = Vec::with_capacity(count * tails.len());
    for v in lo..=hi {
        let token = format!("{v:0width$}");
        for tail in &tails {
            out.push(format!("{prefix}{token}{tail}"));
            if out.len() > MAX_EXPANDED_NODES {
                return Err(RoutingError::Configuration(format!(
                    "pattern '{pattern}' expands past the {MAX_EXPANDED_NODES}-node cap"
                )));
            }
        }
    }
    Ok(out)
}

fn parse_bound(s: &str, pattern: &str) -> Result<u64, RoutingError> {
    s.trim().parse::<u64>().map_err(|_| {
        RoutingError::Configuration(format!(
            "range bound '{s}' in '{pattern}' is not a non-negative integer"
        ))
    })
}

/// Data-source and table names must be plain SQL-ish identifiers.
fn validate_identifier(name: &str) -> Result<(), RoutingError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(RoutingError::Configuration(format!(
            "'{name}' is not a valid identifier"
        )))
    }
}
