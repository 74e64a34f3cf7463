//! CLI subcommand implementations.

pub mod resolve;
pub mod timetable;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use urnik_core::{DocumentFetcher, QueryKey, SchoolSlug, TransportError};

    const PAGE: &str = "<script>var id_sola = '182'; var id_razred = '0'; \
        var id_profesor = '0'; var id_ucilnica = '0'; var id_dijak = '0'; \
        var id_interesna_dejavnost = 'vse'; var teden = '19';</script>";

    const TIMETABLE: &str = "19\u{1f}6. 5. 2024\u{1f}10. 5. 2024\
        <table><tr><th>Ura</th><th><div>Pon</div><div>6. 5.</div></th></tr>\
        <tr><td><div>1. ura</div><div>08:00 - 08:45</div></td>\
        <td style=\"\"><div><table><tr><td><span title=\"Slovenščina\">SLO</span></td></tr>\
        <tr><td><div title=\"Maja Zupan\">ZUPAN, 201</div></td></tr></table></div></td></tr>\
        </table>";

    /// Serves a fixed school with one class and a one-lesson week.
    pub struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self {
                pages: HashMap::new(),
            }
            .with_page("abc", PAGE)
            .with_page(
                "abc/razredi/1a",
                &PAGE.replace("id_razred = '0'", "id_razred = '4402'"),
            )
        }

        pub fn with_page(mut self, path: &str, body: &str) -> Self {
            self.pages.insert(path.to_string(), body.to_string());
            self
        }
    }

    impl DocumentFetcher for FakeFetcher {
        fn fetch_page(&self, path: &str) -> Result<String, TransportError> {
            self.pages
                .get(path)
                .cloned()
                .ok_or_else(|| TransportError::Status {
                    url: path.to_string(),
                    status: 404,
                })
        }

        fn fetch_timetable(&self, _query: &QueryKey) -> Result<String, TransportError> {
            Ok(TIMETABLE.to_string())
        }
    }

    pub fn school() -> SchoolSlug {
        SchoolSlug::new("abc").unwrap()
    }
}
