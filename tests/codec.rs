/*
* Copyright (C) 2026  Henrique Almeida
* This file is part of gridsolve.
*
* gridsolve is free software: you can redistribute it and/or modify
* it under the terms of the GNU Affero General Public License as published
* by the Free Software Foundation, either version 3 of the License, or
* (at your option) any later version.
*
* gridsolve is distributed in the hope that it will be useful,
* but WITHOUT ANY WARRANTY; without even the implied warranty of
* MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
* GNU Affero General Public License for more details.
*
* You should have received a copy of the GNU Affero General Public License
* along with gridsolve.  If not, see <https://www.gnu.org/licenses/>.
*/

use gridsolve_wasm::codec::{self, CodecError, EngineResponse, ProtocolError};
use gridsolve_wasm::kinds::ClueKind;
use gridsolve_wasm::puzzle::{Clue, Puzzle, ValidationError};
use gridsolve_wasm::solution::{Relation, SolutionStep};

const NAME_YEAR_TEXT: &str = "\
[Categories]
Name
Anna
Bob

Year
1990
1991

[Clues]
1,yes,Anna,1990
";

const SIMPLE_TEXT: &str = "\
[Categories]
First Name
Angela
Donald
Leo

Country
Germany
Ireland
United States

Year of Birth
1946
1954
1979

[Clues]
1,yes,United States,1946
2,after,Leo,Year of Birth,Germany
3,or,Donald,1946,Ireland
";

fn build(categories: &[(&str, &[&str])], num_labels: usize) -> Puzzle {
    let mut puzzle = Puzzle::new(num_labels).unwrap();
    for (name, labels) in categories {
        let category = puzzle.add_category(name).unwrap();
        for (position, label) in labels.iter().enumerate() {
            puzzle.add_label(category, position, label).unwrap();
        }
    }
    puzzle
}

#[test]
fn test_encode_name_year_example() {
    let mut puzzle = build(&[("Name", &["Anna", "Bob"]), ("Year", &["1990", "1991"])], 2);
    puzzle
        .add_or_replace_clue(0, Clue::new("1", ClueKind::Yes, vec![0, 2]))
        .unwrap();

    assert_eq!(puzzle.to_canonical_text().unwrap(), NAME_YEAR_TEXT);
}

#[test]
fn test_encode_category_and_number_params() {
    let mut puzzle = build(
        &[
            ("Name", &["Anna", "Bob", "Carl"]),
            ("Place", &["1st", "2nd", "3rd"]),
        ],
        3,
    );
    puzzle
        .add_or_replace_clue(0, Clue::new("a", ClueKind::AfterExactly, vec![2, 1, 0, 2]))
        .unwrap();
    puzzle
        .add_or_replace_clue(1, Clue::new("b", ClueKind::TwoByTwo, vec![0, 1, 3, 4]))
        .unwrap();

    let text = puzzle.to_canonical_text().unwrap();
    assert!(text.ends_with("[Clues]\na,afterexactly,Carl,Place,Anna,2\nb,twobytwo,Anna,Bob,1st,2nd\n"));
}

#[test]
fn test_clue_order_is_preserved() {
    let mut puzzle = build(&[("Name", &["Anna", "Bob"]), ("Year", &["1990", "1991"])], 2);
    for (index, name) in ["z", "a", "m"].iter().enumerate() {
        puzzle
            .add_or_replace_clue(index, Clue::new(*name, ClueKind::No, vec![0, 3]))
            .unwrap();
    }
    let text = puzzle.to_canonical_text().unwrap();
    let clue_names: Vec<&str> = text
        .split("[Clues]\n")
        .nth(1)
        .unwrap()
        .lines()
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(clue_names, ["z", "a", "m"]);
}

#[test]
fn test_decode_simple_puzzle() {
    let puzzle = codec::decode(SIMPLE_TEXT).unwrap();
    assert_eq!(puzzle.categories(), &["First Name", "Country", "Year of Birth"]);
    assert_eq!(puzzle.num_labels(), 3);
    assert_eq!(
        puzzle.clues(),
        &[
            Clue::new("1", ClueKind::Yes, vec![5, 6]),
            Clue::new("2", ClueKind::After, vec![2, 2, 3]),
            Clue::new("3", ClueKind::Or, vec![1, 6, 4]),
        ]
    );
    assert_eq!(puzzle.to_canonical_text().unwrap(), SIMPLE_TEXT);
}

#[test]
fn test_decode_tolerates_surrounding_noise() {
    let text = format!("\n  \ngarbage before\n{}\n\n", SIMPLE_TEXT.replace('\n', "\r\n"));
    let puzzle = codec::decode(&text).unwrap();
    assert_eq!(puzzle.to_canonical_text().unwrap(), SIMPLE_TEXT);
}

#[test]
fn test_decode_categories_only() {
    let layout = codec::decode_categories(NAME_YEAR_TEXT).unwrap();
    assert_eq!(layout.categories, ["Name", "Year"]);
    assert_eq!(layout.labels, ["Anna", "Bob", "1990", "1991"]);
    assert_eq!(layout.num_labels, 2);
}

#[test]
fn test_decode_missing_markers() {
    assert_eq!(
        codec::decode("Name\nAnna\nBob\n"),
        Err(CodecError::MissingCategories)
    );
    assert_eq!(
        codec::decode("[Categories]\nName\nAnna\nBob\n"),
        Err(CodecError::MissingClues)
    );
}

#[test]
fn test_decode_label_count_mismatch() {
    let text = "[Categories]\nName\nAnna\nBob\n\nYear\n1990\n\n[Clues]\n";
    assert_eq!(
        codec::decode(text),
        Err(CodecError::LabelCountMismatch {
            line: 6,
            category: "Year".to_string(),
            expected: 2,
            found: 1,
        })
    );
}

#[test]
fn test_decode_bad_clue_lines() {
    let header = NAME_YEAR_TEXT.trim_end_matches("1,yes,Anna,1990\n");
    let clue_line = header.lines().count() + 1;

    let unknown_kind = format!("{header}1,maybe,Anna,1990\n");
    assert_eq!(
        codec::decode(&unknown_kind),
        Err(CodecError::UnknownClueKind {
            line: clue_line,
            kind: "maybe".to_string(),
        })
    );

    let short = format!("{header}1,yes,Anna\n");
    assert!(matches!(
        codec::decode(&short),
        Err(CodecError::ParamCountMismatch { expected: 2, found: 1, .. })
    ));

    let unknown_label = format!("{header}1,no,Anna,1989\n");
    assert!(matches!(
        codec::decode(&unknown_label),
        Err(CodecError::UnknownLabel { name, .. }) if name == "1989"
    ));

    let bad_number = format!("{header}1,afterexactly,Anna,Year,Bob,two\n");
    assert!(matches!(
        codec::decode(&bad_number),
        Err(CodecError::InvalidNumber { text, .. }) if text == "two"
    ));

    let zero_offset = format!("{header}1,afterexactly,Anna,Year,Bob,0\n");
    assert!(matches!(
        codec::decode(&zero_offset),
        Err(CodecError::Invalid(ValidationError::NumberTooSmall { .. }))
    ));

    assert_eq!(
        codec::decode(header),
        Err(CodecError::Invalid(ValidationError::NoClues))
    );
}

#[test]
fn test_parse_error_response() {
    assert_eq!(
        codec::parse_response(r#"{"error":"contradiction"}"#),
        Ok(EngineResponse::Error("contradiction".to_string()))
    );
}

#[test]
fn test_parse_solution_response() {
    let body = r#"{"solution":[{"Name":"Anna","Year":"1990"}],"steps":[{"label1":"Anna","label2":"1990","yes":true}]}"#;
    let Ok(EngineResponse::Solved(solution)) = codec::parse_response(body) else {
        panic!("expected a solution");
    };
    assert_eq!(solution.rows.len(), 1);
    assert_eq!(solution.label_in_row(0, "Year"), Some("1990"));
    assert_eq!(
        solution.steps,
        [SolutionStep {
            label1: "Anna".to_string(),
            label2: "1990".to_string(),
            yes: true,
            description: None,
        }]
    );
    assert_eq!(solution.relation(1, "Anna", "1990"), Relation::Related);
}

#[test]
fn test_parse_rejects_other_shapes() {
    assert_eq!(
        codec::parse_response(r#"{"error":"x","solution":[],"steps":[]}"#),
        Err(ProtocolError::Ambiguous)
    );
    assert_eq!(codec::parse_response("{}"), Err(ProtocolError::Empty));
    assert_eq!(codec::parse_response("[]"), Err(ProtocolError::NotAnObject));
    assert_eq!(
        codec::parse_response(r#"{"error":"x","extra":1}"#),
        Err(ProtocolError::UnexpectedField {
            field: "extra".to_string()
        })
    );
    assert!(matches!(
        codec::parse_response(r#"{"error":3}"#),
        Err(ProtocolError::Malformed { .. })
    ));
    assert!(matches!(
        codec::parse_response(r#"{"solution":[]}"#),
        Err(ProtocolError::Malformed { .. })
    ));
    assert!(matches!(
        codec::parse_response("solver crashed"),
        Err(ProtocolError::Malformed { .. })
    ));
}
