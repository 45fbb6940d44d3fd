use libdigiisa::Word;

/// Code to segment mask (`0bGFEDCBA`) pairs, searched front to back.
///
/// The table is not injective: `53` is listed for both 5 and 6, and the ASCII
/// digits from `'6'` on are shifted by one (`54` renders a 7). First match
/// wins, so `53` renders a 5 and `57` renders nothing.
const SEGMENT_TABLE: [(&[Word], Word); 19] = [
    (&[0, 48], 0b0111111),
    (&[1, 49], 0b0000110),
    (&[2, 50], 0b1011011),
    (&[3, 51], 0b1001111),
    (&[4, 52], 0b1100110),
    (&[5, 53], 0b1101101),
    (&[6, 53], 0b1111101),
    (&[7, 54], 0b0000111),
    (&[8, 55], 0b1111111),
    (&[9, 56], 0b1101111),
    (&[10, 65, 97], 0b1110111),
    (&[11, 66, 98], 0b1111100),
    (&[12, 67, 99], 0b0111001),
    (&[13, 68, 100], 0b1011110),
    (&[14, 69, 101], 0b1111001),
    (&[15, 70, 102], 0b1110001),
    (&[45], 0b1000000),
    (&[95], 0b0001000),
    // 'X' and 'x' blank the digit.
    (&[88, 120], 0),
];

/// Seven segment mask for a digit, hex letter, `-`, `_` or blank code.
pub fn segments(code: Word) -> Option<Word> {
    SEGMENT_TABLE
        .iter()
        .find(|(codes, _)| codes.contains(&code))
        .map(|(_, mask)| *mask)
}
