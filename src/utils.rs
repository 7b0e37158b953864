use crate::engine::{Board, Cell, Plate, Position, SliceKind, MAX_BOARD_DIM, PLATE_CAPACITY};
use crate::error::{Error, Result};

/// Parses a plate token such as `[0011]` or `[]`.
///
/// Each digit between the brackets is one slice of that kind.
///
/// # Errors
/// `Error::InvalidLevelConfig` if the brackets are missing, a character is not
/// a digit, or more than `PLATE_CAPACITY` slices are listed.
pub fn plate_from_str(s: &str) -> Result<Plate> {
    let inner = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    parse_slices(inner, s)
}

fn parse_slices(digits: &str, token: &str) -> Result<Plate> {
    let mut kinds = Vec::with_capacity(digits.len());
    for c in digits.chars() {
        let kind = SliceKind::from_char(c).ok_or_else(|| {
            Error::InvalidLevelConfig(format!("unrecognized slice '{}' in plate '{}'", c, token))
        })?;
        kinds.push(kind);
    }
    if kinds.len() > PLATE_CAPACITY {
        return Err(Error::InvalidLevelConfig(format!(
            "plate '{}' holds {} slices, at most {} fit",
            token,
            kinds.len(),
            PLATE_CAPACITY
        )));
    }
    Plate::from_slices(kinds)
        .ok_or_else(|| Error::InvalidLevelConfig(format!("plate '{}' is over capacity", token)))
}

fn parse_cell(token: &str, pos: Position) -> Result<Cell> {
    if token == "." {
        return Ok(Cell::Empty);
    }
    if token.starts_with('[') {
        if !token.ends_with(']') {
            return Err(Error::InvalidLevelConfig(format!(
                "unterminated plate '{}' at {}",
                token, pos
            )));
        }
        return plate_from_str(token).map(Cell::Plate);
    }
    let mut chars = token.chars();
    match (chars.next().and_then(SliceKind::from_char), chars.next()) {
        (Some(kind), None) => Ok(Cell::Slice(kind)),
        _ => Err(Error::InvalidLevelConfig(format!(
            "unrecognized cell '{}' at {}",
            token, pos
        ))),
    }
}

/// Parses layout rows into a `Board`.
///
/// Each string is one row, top first. Cells are separated by whitespace:
/// - `.`: an empty cell
/// - a digit `0`-`9`: a loose slice of that kind
/// - `[digits]`: a plate holding those slices (`[]` is an empty plate)
///
/// # Errors
/// `Error::InvalidLevelConfig` if there are no rows, rows differ in length,
/// the board exceeds `MAX_BOARD_DIM`, or a token is malformed.
///
/// # Examples
/// ```
/// use cake_sort_solver::utils::board_from_str_array;
/// use cake_sort_solver::engine::{Cell, Position};
///
/// let board = board_from_str_array(&["[0011] 2", ". ."]).unwrap();
/// assert_eq!(board.rows(), 2);
/// assert_eq!(board.cols(), 2);
/// assert_eq!(board.plate(Position::new(0, 0)).unwrap().len(), 4);
/// assert!(matches!(board.get(Position::new(0, 1)), Some(Cell::Slice(_))));
///
/// assert!(board_from_str_array(&["[0x]"]).is_err());
/// assert!(board_from_str_array(&[". .", "."]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board> {
    if s.is_empty() {
        return Err(Error::InvalidLevelConfig("layout has no rows".to_string()));
    }
    if s.len() > MAX_BOARD_DIM {
        return Err(Error::InvalidLevelConfig(format!(
            "layout has {} rows, at most {} allowed",
            s.len(),
            MAX_BOARD_DIM
        )));
    }

    let rows: Vec<Vec<&str>> = s.iter().map(|row| row.split_whitespace().collect()).collect();
    let cols = rows[0].len();
    if cols == 0 || cols > MAX_BOARD_DIM {
        return Err(Error::InvalidLevelConfig(format!(
            "row 0 has {} cells, expected 1 to {}",
            cols, MAX_BOARD_DIM
        )));
    }

    let mut board = Board::new_empty(rows.len(), cols);
    for (r, tokens) in rows.iter().enumerate() {
        if tokens.len() != cols {
            return Err(Error::InvalidLevelConfig(format!(
                "row {} has {} cells, expected {}",
                r,
                tokens.len(),
                cols
            )));
        }
        for (c, token) in tokens.iter().enumerate() {
            let pos = Position::new(r, c);
            board.set(pos, parse_cell(token, pos)?);
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&["[0000000] 0 .", ". [] 1"]).unwrap();
        assert_eq!(board.plate(Position::new(0, 0)).unwrap().len(), 7);
        assert_eq!(
            board.get(Position::new(0, 1)),
            Some(&Cell::Slice(SliceKind::new(0).unwrap()))
        );
        assert!(board.plate(Position::new(1, 1)).unwrap().is_empty());
        assert_eq!(board.get(Position::new(1, 0)), Some(&Cell::Empty));
    }

    #[test]
    fn test_board_from_str_array_round_trips_layout_rows() {
        let rows = ["[0123] . 9", "[] 4 ."];
        let board = board_from_str_array(&rows).unwrap();
        let layout = board.layout_rows();
        let again: Vec<&str> = layout.iter().map(String::as_str).collect();
        assert_eq!(board_from_str_array(&again).unwrap(), board);
    }

    #[test]
    fn test_board_from_str_array_invalid_char() {
        let err = board_from_str_array(&["[01X]"]).unwrap_err();
        assert!(err.to_string().contains("unrecognized slice 'X'"));

        let err = board_from_str_array(&["x"]).unwrap_err();
        assert!(err.to_string().contains("unrecognized cell 'x'"));
    }

    #[test]
    fn test_board_from_str_array_plate_over_capacity() {
        let err = board_from_str_array(&["[000000000]"]).unwrap_err();
        assert!(err.to_string().contains("at most 8 fit"));
    }

    #[test]
    fn test_board_from_str_array_ragged_rows() {
        let err = board_from_str_array(&[". .", ". . ."]).unwrap_err();
        assert!(err.to_string().contains("row 1 has 3 cells"));
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert!(board_from_str_array(&rows).is_err());
        assert!(board_from_str_array(&[""]).is_err());
    }

    #[test]
    fn test_board_from_str_array_too_many_rows() {
        let rows = vec!["."; MAX_BOARD_DIM + 1];
        let err = board_from_str_array(&rows).unwrap_err();
        assert!(err.to_string().contains("at most 16 allowed"));
    }

    #[test]
    fn test_plate_from_str() {
        let plate = plate_from_str("[2210]").unwrap();
        assert_eq!(plate.len(), 4);
        assert_eq!(plate.dominant_kind(), SliceKind::new(2));
        assert!(plate_from_str("[]").unwrap().is_empty());
        // Bare digits are accepted for tray entries.
        assert_eq!(plate_from_str("11").unwrap().len(), 2);
    }
}
