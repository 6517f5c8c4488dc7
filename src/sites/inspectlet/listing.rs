//! 站点列表抓取 (Site Listing Extraction)
//!
//! 尽力而为的抓取：任一行缺少链接或图标单元格即停止，保留此前已解析的记录，
//! 诊断信息交由调用方决定是否记录，不会作为错误向上传播。

use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::debug;

use super::selectors::{
    CELL_CAPTURES, CELL_FORMS, CELL_HEATMAPS, CELL_NAME, CELL_STATUS, ListingSelectors,
};
use crate::core::model::SiteRecord;

/// captures 链接中的固定前缀，去除后即站点 ID
pub const CAPTURES_PREFIX: &str = "/dashboard/captures/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("row {row}: missing `{cell}` cell")]
    MissingCell { row: usize, cell: &'static str },

    #[error("row {row}: missing <{tag}> inside `{cell}` cell")]
    MissingElement {
        row: usize,
        cell: &'static str,
        tag: &'static str,
    },
}

/// 解析列表页，返回 (已解析记录, 中断原因)
pub fn extract_sites(html: &str) -> (Vec<SiteRecord>, Option<ScrapeError>) {
    let doc = Html::parse_document(html);
    if !doc.errors.is_empty() {
        debug!("HTML 解析告警 {} 条 (已忽略)", doc.errors.len());
    }

    let s = ListingSelectors::get();
    let mut sites = Vec::new();

    for (index, row) in doc.select(&s.site_rows).enumerate() {
        match parse_row(index, row) {
            Ok(site) => sites.push(site),
            Err(e) => return (sites, Some(e)),
        }
    }

    (sites, None)
}

fn parse_row(row_index: usize, row: ElementRef<'_>) -> Result<SiteRecord, ScrapeError> {
    // 名称单元格缺失时记为空串，只有链接/图标缺失才中断
    let name = cell(row_index, row, CELL_NAME)
        .map(|c| c.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let captures = cell_attr(row_index, row, CELL_CAPTURES, "a", "href")?;
    let heatmaps = cell_attr(row_index, row, CELL_HEATMAPS, "a", "href")?;
    let forms = cell_attr(row_index, row, CELL_FORMS, "a", "href")?;
    let status = cell_attr(row_index, row, CELL_STATUS, "img", "src")?;

    Ok(SiteRecord {
        id: remove_ignore_ascii_case(&captures, CAPTURES_PREFIX),
        name,
        captures,
        heatmaps,
        forms,
        status,
    })
}

/// 行内直接子 div，class 包含给定名称
fn cell<'a>(
    row_index: usize,
    row: ElementRef<'a>,
    class: &'static str,
) -> Result<ElementRef<'a>, ScrapeError> {
    row.children()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value().name() == "div"
                && el.value().attr("class").is_some_and(|c| c.contains(class))
        })
        .ok_or(ScrapeError::MissingCell {
            row: row_index,
            cell: class,
        })
}

/// 单元格内直接子元素的属性值 (属性缺失视为空串)
fn cell_attr(
    row_index: usize,
    row: ElementRef<'_>,
    class: &'static str,
    tag: &'static str,
    attr: &str,
) -> Result<String, ScrapeError> {
    let cell = cell(row_index, row, class)?;
    let el = cell
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
        .ok_or(ScrapeError::MissingElement {
            row: row_index,
            cell: class,
            tag,
        })?;
    Ok(el.value().attr(attr).unwrap_or_default().trim().to_string())
}

/// 移除所有（忽略 ASCII 大小写的）匹配片段
fn remove_ignore_ascii_case(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let lowered = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(pos) = lowered[cursor..].find(&needle) {
        out.push_str(&haystack[cursor..cursor + pos]);
        cursor += pos + needle.len();
    }
    out.push_str(&haystack[cursor..]);
    out
}
