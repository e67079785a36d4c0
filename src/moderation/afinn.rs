/// AFINN-165 valence lexicon in its `word<TAB>valence` distribution format.
pub const AFINN_165: &str = include_str!("AFINN-165.txt");

pub const NEGATORS: &[&str] = &[
    "cant", "can't", "dont", "don't", "doesnt", "doesn't", "not", "non", "wont", "won't", "isnt",
    "isn't",
];
