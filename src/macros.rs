#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`SubstitutionTable`](crate::SubstitutionTable) from
/// `"src rule" => "tgt rule"` pairs.
///
/// Panics on malformed signature text; meant for fixtures and demos. Parse
/// signatures explicitly when the text is untrusted.
#[macro_export]
macro_rules! subst_table {
    ( $( $src:literal => $tgt:literal ),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut table = $crate::SubstitutionTable::new();
        $(
            table.insert(
                $src.parse::<$crate::Signature>().expect("malformed source signature"),
                $tgt.parse::<$crate::Signature>().expect("malformed target signature"),
            );
        )*
        table
    }};
}

/// Build a [`TagDictionary`](crate::TagDictionary) from nested
/// `"tag" => { "word" => choice }` entries, where a choice is either a
/// single literal or a `[..]` candidate list.
#[macro_export]
macro_rules! tag_dict {
    ( $( $tag:literal => { $( $src:literal => $choice:tt ),* $(,)? } ),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut dict = $crate::TagDictionary::new();
        $( $( dict.insert($tag, $src, $crate::tag_dict!(@choice $choice)); )* )*
        dict
    }};
    (@choice [ $( $word:literal ),* $(,)? ]) => {
        $crate::WordChoice::Any(vec![ $( $word.to_string() ),* ])
    };
    (@choice $word:literal) => {
        $crate::WordChoice::One($word.to_string())
    };
}
