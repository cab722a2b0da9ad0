//! Relation path parsing.
//!
//! Graph traversal renders paths in an arrow grammar:
//!
//! ```text
//! Paris -CapitalOf-> France
//! France <-CapitalOf- Paris
//! Tom -Knows-> Bob -Loves-> Alice
//! ```
//!
//! A right hop is `" -" relation "-> "` and a left hop is
//! `" <-" relation "- "`. Each hop yields one [`Triplet`] oriented
//! source-to-destination regardless of the arrow's direction on the page.
//! Entity names may themselves contain dashes (`state-of-the-art`): only a
//! dash adjacent to whitespace, and not part of an arrow token, delimits a
//! hop.

use crate::error::RelationParseError;
use crate::types::Triplet;

/// The direction a single hop points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HopDirection {
    /// `src -rel-> dst`
    Right,
    /// `dst <-rel- src`
    Left,
}

/// An arrow token: its byte offset and direction.
#[derive(Debug, Clone, Copy)]
struct Arrow {
    pos: usize,
    dir: HopDirection,
}

/// Scan for `->` and `<-` tokens, left to right, non-overlapping.
fn scan_arrows(path: &str) -> Vec<Arrow> {
    let bytes = path.as_bytes();
    let mut arrows = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        match &bytes[i..i + 2] {
            b"->" => {
                arrows.push(Arrow {
                    pos: i,
                    dir: HopDirection::Right,
                });
                i += 2;
            }
            b"<-" => {
                arrows.push(Arrow {
                    pos: i,
                    dir: HopDirection::Left,
                });
                i += 2;
            }
            _ => i += 1,
        }
    }
    arrows
}

/// Scan for boundary dashes: a `-` that is not part of an arrow token and
/// has whitespace on at least one side.
fn scan_boundary_dashes(path: &str) -> Vec<usize> {
    let bytes = path.as_bytes();
    let mut dashes = Vec::new();
    for i in 0..bytes.len() {
        if bytes[i] != b'-' {
            continue;
        }
        // Part of "->" or "<-".
        if bytes.get(i + 1) == Some(&b'>') || (i > 0 && bytes[i - 1] == b'<') {
            continue;
        }
        let space_before = i > 0 && bytes[i - 1] == b' ';
        let space_after = bytes.get(i + 1) == Some(&b' ');
        if space_before || space_after {
            dashes.push(i);
        }
    }
    dashes
}

/// Trim a slice of the path into a triplet field, rejecting empties.
fn field(
    path: &str,
    range: std::ops::Range<usize>,
    name: &'static str,
    hop: usize,
) -> Result<String, RelationParseError> {
    let text = path
        .get(range)
        .map(str::trim)
        .unwrap_or("");
    if text.is_empty() {
        return Err(RelationParseError::EmptyField {
            field: name,
            hop,
            path: path.to_string(),
        });
    }
    Ok(text.to_string())
}

/// Parse one relation path into its constituent triplets, in hop order.
///
/// Every triplet comes back oriented source-to-destination: a left hop
/// `B <-R- A` parses to `(A, R, B)`.
pub fn parse(path: &str) -> Result<Vec<Triplet>, RelationParseError> {
    let arrows = scan_arrows(path);
    if arrows.is_empty() {
        return Err(RelationParseError::NoHop {
            path: path.to_string(),
        });
    }
    let dashes = scan_boundary_dashes(path);
    if dashes.len() != arrows.len() {
        return Err(RelationParseError::UnpairedBoundary {
            arrows: arrows.len(),
            dashes: dashes.len(),
            path: path.to_string(),
        });
    }

    let n = arrows.len();
    let mut triplets = Vec::with_capacity(n);
    for i in 0..n {
        let arrow = arrows[i];
        let dash = dashes[i];

        // Entity text shared with the previous hop stops at that hop's
        // delimiters; the first hop owns the start of the string.
        let left_bound = if i == 0 {
            0
        } else {
            (dashes[i - 1] + 1).max(arrows[i - 1].pos + 2)
        };
        // Likewise the last hop owns the end of the string.
        let right_bound = if i == n - 1 {
            path.len()
        } else {
            dashes[i + 1].min(arrows[i + 1].pos)
        };

        let triplet = match arrow.dir {
            HopDirection::Right => {
                // src -rel-> dst: dash precedes arrow.
                if dash >= arrow.pos {
                    return Err(RelationParseError::MalformedHop {
                        hop: i,
                        path: path.to_string(),
                    });
                }
                Triplet::new(
                    field(path, left_bound..dash, "source", i)?,
                    field(path, dash + 1..arrow.pos, "relation", i)?,
                    field(path, arrow.pos + 2..right_bound, "destination", i)?,
                )
            }
            HopDirection::Left => {
                // dst <-rel- src: arrow precedes dash.
                if dash <= arrow.pos + 1 {
                    return Err(RelationParseError::MalformedHop {
                        hop: i,
                        path: path.to_string(),
                    });
                }
                Triplet::new(
                    field(path, dash + 1..right_bound, "source", i)?,
                    field(path, arrow.pos + 2..dash, "relation", i)?,
                    field(path, left_bound..arrow.pos, "destination", i)?,
                )
            }
        };
        triplets.push(triplet);
    }
    Ok(triplets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str, r: &str, d: &str) -> Triplet {
        Triplet::new(s, r, d)
    }

    #[test]
    fn single_right_hop() {
        let got = parse("Paris -CapitalOf-> France").unwrap();
        assert_eq!(got, vec![t("Paris", "CapitalOf", "France")]);
    }

    #[test]
    fn single_left_hop_reorients() {
        let got = parse("Paris <-CapitalOf- France").unwrap();
        assert_eq!(got, vec![t("France", "CapitalOf", "Paris")]);
    }

    #[test]
    fn two_right_hops_share_middle_entity() {
        let got = parse("Tom -Knows-> Bob -Loves-> Alice").unwrap();
        assert_eq!(
            got,
            vec![t("Tom", "Knows", "Bob"), t("Bob", "Loves", "Alice")]
        );
    }

    #[test]
    fn right_then_left() {
        let got = parse(
            "Google's nest thermostat -Is on sale for-> $90 \
             <-Was originally priced at- Echo show 5 (third-gen)",
        )
        .unwrap();
        assert_eq!(
            got,
            vec![
                t("Google's nest thermostat", "Is on sale for", "$90"),
                t("Echo show 5 (third-gen)", "Was originally priced at", "$90"),
            ]
        );
    }

    #[test]
    fn left_then_right() {
        let got = parse("Bob <-Knows- Tom -Loves-> Alice").unwrap();
        assert_eq!(
            got,
            vec![t("Tom", "Knows", "Bob"), t("Tom", "Loves", "Alice")]
        );
    }

    #[test]
    fn left_then_left() {
        let got = parse("Alice <-Loves- Bob <-Knows- Tom").unwrap();
        assert_eq!(
            got,
            vec![t("Bob", "Loves", "Alice"), t("Tom", "Knows", "Bob")]
        );
    }

    #[test]
    fn three_hop_chain() {
        let got = parse("A -R1-> B -R2-> C -R3-> D").unwrap();
        assert_eq!(
            got,
            vec![t("A", "R1", "B"), t("B", "R2", "C"), t("C", "R3", "D")]
        );
    }

    #[test]
    fn hyphenated_entity_is_not_a_boundary() {
        let got = parse("state-of-the-art model -UsedBy-> e-commerce").unwrap();
        assert_eq!(got, vec![t("state-of-the-art model", "UsedBy", "e-commerce")]);
    }

    #[test]
    fn hyphenated_relation_interior_dash_kept() {
        let got = parse("Alice -co-founded-> Acme").unwrap();
        assert_eq!(got, vec![t("Alice", "co-founded", "Acme")]);
    }

    #[test]
    fn no_arrow_is_an_error() {
        let err = parse("Paris CapitalOf France").unwrap_err();
        assert!(matches!(err, RelationParseError::NoHop { .. }));
    }

    #[test]
    fn stray_boundary_dash_is_an_error() {
        // "A - B" contributes an extra boundary dash with no paired arrow.
        let err = parse("A - B -R-> C").unwrap_err();
        assert!(matches!(
            err,
            RelationParseError::UnpairedBoundary { arrows: 1, dashes: 2, .. }
        ));
    }

    #[test]
    fn arrow_without_dash_is_an_error() {
        let err = parse("A => B -> C").unwrap_err();
        assert!(matches!(err, RelationParseError::UnpairedBoundary { .. }));
    }

    #[test]
    fn empty_relation_is_an_error() {
        let err = parse("A - -> B").unwrap_err();
        assert!(matches!(
            err,
            RelationParseError::EmptyField { field: "relation", .. }
        ));
    }

    #[test]
    fn empty_path_is_an_error() {
        assert!(matches!(parse("").unwrap_err(), RelationParseError::NoHop { .. }));
    }

    #[test]
    fn fields_are_trimmed() {
        let got = parse("  Paris   -CapitalOf->   France  ").unwrap();
        assert_eq!(got, vec![t("Paris", "CapitalOf", "France")]);
    }
}
