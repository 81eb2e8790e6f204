use crate::domain::{Ingredient, Recipe, RecipePatch};

/// Number of columns in a recipe row: timestamp, title, ingredients, steps.
pub const ROW_FIELDS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSheet {
    pub recipes: Vec<Recipe>,
    pub skipped_rows: usize,
}

/// Splits tab-separated text into rows of fields.
///
/// Rows end at `\n`, `\r\n` or a lone `\r`. A field opening with `"` is quoted
/// until the matching `"`: tabs and line breaks inside it are kept (breaks
/// normalized to `\n`) and `""` stands for one literal quote. A blank line is
/// a row with no fields.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut at_field_start = true;
    let mut touched = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted = false,
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    field.push('\n');
                }
                other => field.push(other),
            }
            continue;
        }

        match ch {
            '"' if at_field_start => {
                quoted = true;
                at_field_start = false;
                touched = true;
            }
            '\t' => {
                row.push(std::mem::take(&mut field));
                at_field_start = true;
                touched = true;
            }
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if touched {
                    row.push(std::mem::take(&mut field));
                }
                rows.push(std::mem::take(&mut row));
                at_field_start = true;
                touched = false;
            }
            other => {
                field.push(other);
                at_field_start = false;
                touched = true;
            }
        }
    }

    if touched {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// Builds a recipe from one row already split into fields.
///
/// Returns `None` unless the row has exactly [`ROW_FIELDS`] fields. The
/// timestamp column is ignored.
pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> Option<Recipe> {
    let [_timestamp, title, ingredients, steps] = fields else {
        return None;
    };
    let title = title.as_ref();

    let mut recipe = Recipe {
        title: (!title.trim().is_empty()).then(|| title.to_string()),
        ingredients: parse_ingredients(ingredients.as_ref()),
        steps: parse_steps(steps.as_ref()),
        duration: None,
        amount: None,
        people: None,
    };
    if let Some(patch) = RecipePatch::lookup(title) {
        patch.apply(&mut recipe);
    }
    Some(recipe)
}

/// Parses a single row string, splitting it on tabs.
pub fn parse_row(line: &str) -> Option<Recipe> {
    let fields = line.split('\t').collect::<Vec<_>>();
    parse_fields(&fields)
}

/// Parses every row of a sheet export, counting the rows it had to skip.
pub fn parse_sheet(text: &str) -> ParsedSheet {
    let mut parsed = ParsedSheet::default();
    for (index, fields) in split_rows(text).iter().enumerate() {
        match parse_fields(fields) {
            Some(recipe) => parsed.recipes.push(recipe),
            None => {
                tracing::debug!(row = index + 1, fields = fields.len(), "skipping row");
                parsed.skipped_rows += 1;
            }
        }
    }
    parsed
}

/// One ingredient per non-empty line; lines without a space are dropped.
pub fn parse_ingredients(block: &str) -> Option<Vec<Ingredient>> {
    let ingredients = block
        .trim()
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .filter_map(Ingredient::from_line)
        .collect::<Vec<_>>();
    (!ingredients.is_empty()).then_some(ingredients)
}

pub fn parse_steps(block: &str) -> Option<Vec<String>> {
    let block = block.trim();
    if block.is_empty() {
        return None;
    }
    Some(
        block
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_rows_plain() {
        let rows = split_rows("a\tb\tc\td\ne\tf\n");
        assert_eq!(rows, vec![vec!["a", "b", "c", "d"], vec!["e", "f"]]);
    }

    #[test]
    fn split_rows_quoted_multiline_cells() {
        let text = "ts\tCrêpes\t\"Farine 250g\r\nOeufs 3\"\t\"Mélanger\nCuire \"\"à feu doux\"\"\"\r\n";
        let rows = split_rows(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][2], "Farine 250g\nOeufs 3");
        assert_eq!(rows[0][3], "Mélanger\nCuire \"à feu doux\"");
    }

    #[test]
    fn split_rows_blank_line_is_empty_row() {
        let rows = split_rows("a\tb\n\nc\n");
        assert_eq!(rows[1], Vec::<String>::new());
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn split_rows_lone_carriage_return_ends_row() {
        let rows = split_rows("a\tb\rc\td\r\ne");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    }

    #[test]
    fn split_rows_keeps_trailing_empty_field() {
        assert_eq!(split_rows("a\t"), vec![vec!["a", ""]]);
    }

    #[test]
    fn parse_fields_requires_four_columns() {
        assert!(parse_fields(&["a", "b", "c"]).is_none());
        assert!(parse_fields(&["a", "b", "c", "d", "e"]).is_none());
        assert!(parse_fields(&["a", "b", "c", "d"]).is_some());
    }

    #[test]
    fn empty_cells_become_null() {
        let recipe = parse_row("ts\t  \t\n \t").unwrap();
        assert_eq!(recipe.title, None);
        assert_eq!(recipe.ingredients, None);
        assert_eq!(recipe.steps, None);
    }

    #[test]
    fn ingredients_without_quantity_only_is_null() {
        assert_eq!(parse_ingredients("Sel\nPoivre"), None);
    }

    #[test]
    fn steps_keep_inner_blank_lines() {
        assert_eq!(
            parse_steps("\n Un\n\nDeux \n").unwrap(),
            vec!["Un".to_string(), String::new(), "Deux".to_string()]
        );
    }

    #[test]
    fn parse_sheet_counts_skipped_rows() {
        let parsed = parse_sheet("only\ttwo\nts\tSoupe\tEau 1l\tBouillir\n");
        assert_eq!(parsed.recipes.len(), 1);
        assert_eq!(parsed.skipped_rows, 1);
    }
}
