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

use gridsolve_wasm::kinds::{self, ClueKind, ParamType};

#[test]
fn test_lookup_every_catalogue_name() {
    for kind in ClueKind::ALL {
        assert_eq!(ClueKind::lookup(kind.name()), Some(kind));
    }
    assert_eq!(ClueKind::lookup("afterexactly"), Some(ClueKind::AfterExactly));
    assert_eq!(ClueKind::lookup("twobytwo"), Some(ClueKind::TwoByTwo));
}

#[test]
fn test_lookup_unknown_name() {
    assert_eq!(ClueKind::lookup("maybe"), None);
    assert_eq!(ClueKind::lookup("Yes"), None, "names are case-sensitive");
    assert_eq!(ClueKind::lookup(""), None);
}

#[test]
fn test_parameter_types() {
    use ParamType::{Category, Label, Number};
    assert_eq!(ClueKind::Yes.params(), &[Label, Label]);
    assert_eq!(ClueKind::No.params(), &[Label, Label]);
    assert_eq!(ClueKind::After.params(), &[Label, Category, Label]);
    assert_eq!(
        ClueKind::AfterExactly.params(),
        &[Label, Category, Label, Number]
    );
    assert_eq!(ClueKind::Or.params(), &[Label, Label, Label]);
    assert_eq!(ClueKind::Xor.params(), &[Label, Label, Label]);
    assert_eq!(ClueKind::TwoByTwo.params(), &[Label, Label, Label, Label]);
}

#[test]
fn test_number_floor() {
    assert_eq!(ClueKind::AfterExactly.min_number(), 1);
    assert_eq!(ClueKind::After.min_number(), 0);
}

#[test]
fn test_catalogue_matches_kinds() {
    let catalogue = kinds::catalogue();
    assert_eq!(catalogue.len(), ClueKind::ALL.len());
    for (info, kind) in catalogue.iter().zip(ClueKind::ALL) {
        assert_eq!(info.name, kind.name());
        assert_eq!(info.params, kind.params());
    }
}

#[test]
fn test_serde_names_match_catalogue_names() {
    for kind in ClueKind::ALL {
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.name()));
        let back: ClueKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
}
