//! 仪表盘列表页选择器
//!
//! 预编译的 CSS 选择器与单元格类名

use std::sync::OnceLock;

use scraper::Selector;

/// 站点列表行：`#sitelist` 下 class 恰为两种斑马纹之一的 div
const SITE_ROWS: &str = r#"div#sitelist > div[class="trow listcolor1"], div#sitelist > div[class="trow listcolor2"]"#;

pub const CELL_NAME: &str = "cname";
pub const CELL_CAPTURES: &str = "crecenabled";
pub const CELL_HEATMAPS: &str = "cheatmaps";
pub const CELL_FORMS: &str = "cformanalytics";
pub const CELL_STATUS: &str = "cstatus";

/// 选择器集合
pub struct ListingSelectors {
    pub site_rows: Selector,
}

static SELECTORS: OnceLock<ListingSelectors> = OnceLock::new();

impl ListingSelectors {
    /// 获取全局选择器实例
    pub fn get() -> &'static ListingSelectors {
        SELECTORS.get_or_init(|| ListingSelectors {
            site_rows: Selector::parse(SITE_ROWS).expect("static selector"),
        })
    }
}
