pub const FULL: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "+git.",
    env!("DAYBOOK_GIT_COUNT"),
    ".",
    env!("DAYBOOK_GIT_SHA"),
    env!("DAYBOOK_GIT_DIRTY")
);
