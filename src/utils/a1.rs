/// Column letters for a 0-indexed column (`0` is `A`, `27` is `AB`)
pub fn col_to_name(col: u32) -> String {
    // A1 columns are 1-based, we store 0-based internally
    let mut n = col + 1;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// A1 reference for a 0-indexed cell
pub fn cell_to_a1(row: u32, col: u32) -> String {
    format!("{}{}", col_to_name(col), row + 1)
}

/// Inclusive 1-based span of one column, e.g. `D2:D7`
pub fn column_span(col: u32, first_row: u32, last_row: u32) -> String {
    let name = col_to_name(col);
    format!("{}{}:{}{}", name, first_row, name, last_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_name() {
        assert_eq!(col_to_name(0), "A");
        assert_eq!(col_to_name(4), "E");
        assert_eq!(col_to_name(25), "Z");
        assert_eq!(col_to_name(26), "AA");
        assert_eq!(col_to_name(54), "BC");
    }

    #[test]
    fn test_cell_and_span() {
        assert_eq!(cell_to_a1(4, 0), "A5");
        assert_eq!(column_span(3, 2, 10), "D2:D10");
    }
}
