use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(TITLE_SELECTOR, "title");
selector!(META_SELECTOR, "meta[content]");
selector!(LINK_SELECTOR, "link[rel][href]");
selector!(HTML_SELECTOR, "html[lang]");
selector!(SCRIPT_SELECTOR, "script[type]");

pub(crate) const JSON_LD_TYPE: &str = "application/ld+json";
