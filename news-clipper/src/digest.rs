use crate::normalizer::clean_text;
use crate::time::TimeNormalizer;
use crate::types::NewsItem;
use chrono::{DateTime, FixedOffset};
use tracing::debug;

pub const DIGEST_TITLE: &str = "한국 정치 뉴스 클리핑";

const CELL_STYLE: &str = "padding: 12px; border: 2px solid #333; vertical-align: top;";
const HEADER_CELL_STYLE: &str = "background-color: #4a4a4a; color: white; padding: 12px; text-align: left; font-weight: bold; border: 2px solid #333; font-size: 14px;";

/// Renders the final item list as an email-friendly HTML page (inline styles
/// only) plus a plain-text alternative.
#[derive(Debug, Clone, Default)]
pub struct DigestRenderer {
    time: TimeNormalizer,
}

impl DigestRenderer {
    pub fn new(time: TimeNormalizer) -> Self {
        Self { time }
    }

    pub fn render(&self, items: &[NewsItem], generated_at: DateTime<FixedOffset>) -> String {
        debug!("Rendering HTML digest with {} items", items.len());

        let mut html = String::with_capacity(4096 + items.len() * 1024);
        html.push_str(&format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body style="font-family: 'Malgun Gothic', Arial, sans-serif; margin: 20px; background-color: #f5f5f5;">
    <div style="background-color: white; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 10px rgba(0,0,0,0.1);">
        <div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; text-align: center;">
            <h2 style="margin: 0; font-size: 24px;">🗞️ {title}</h2>
            <p style="margin: 5px 0 0 0; opacity: 0.9;">{date} | 총 {count}개 기사</p>
        </div>
        <table style="width: 100%; border-collapse: collapse; border: 2px solid #333; background-color: white;">
            <thead>
                <tr>
                    <th style="{th}" width="40%">제목</th>
                    <th style="{th}" width="35%">내용</th>
                    <th style="{th}" width="15%">언론사</th>
                    <th style="{th}" width="10%">시간</th>
                </tr>
            </thead>
            <tbody>
"#,
            title = DIGEST_TITLE,
            date = generated_at.format("%Y년 %m월 %d일"),
            count = items.len(),
            th = HEADER_CELL_STYLE,
        ));

        for (i, item) in items.iter().enumerate() {
            let background = if (i + 1) % 2 == 0 { "#f8fafc" } else { "white" };
            html.push_str(&format!(
                r#"                <tr>
                    <td style="{cell} background-color: {bg}; font-weight: bold;">
                        <a href="{link}" target="_blank" style="text-decoration: none; color: #333;">{title}</a>
                    </td>
                    <td style="{cell} background-color: {bg}; color: #666; font-size: 14px; line-height: 1.4;">{summary}</td>
                    <td style="{cell} background-color: {bg};">
                        <span style="display: inline-block; background-color: #e9ecef; color: #495057; padding: 4px 8px; border-radius: 12px; font-size: 12px; font-weight: bold;">{source}</span>
                    </td>
                    <td style="{cell} background-color: {bg}; color: #6c757d; font-size: 12px;">{time}</td>
                </tr>
"#,
                cell = CELL_STYLE,
                bg = background,
                link = html_escape::encode_double_quoted_attribute(&item.link),
                title = safe_text(&item.title),
                summary = safe_text(&item.summary),
                source = safe_text(&item.source),
                time = self.time.to_display_time(&item.published),
            ));
        }

        html.push_str(
            r#"            </tbody>
        </table>
        <div style="background-color: #f8f9fa; padding: 15px; text-align: center; color: #6c757d; font-size: 12px;">
            📧 한국 정치 뉴스 자동 클리핑 | 매일 오전 발송
        </div>
    </div>
</body>
</html>
"#,
        );

        html
    }

    pub fn render_text(&self, items: &[NewsItem], generated_at: DateTime<FixedOffset>) -> String {
        let mut text = format!(
            "{}\n{} | 총 {}개 기사\n\n",
            DIGEST_TITLE,
            generated_at.format("%Y년 %m월 %d일"),
            items.len()
        );

        for (i, item) in items.iter().enumerate() {
            text.push_str(&format!(
                "{}. [{}] {} ({})\n",
                i + 1,
                item.source,
                item.title,
                self.time.to_display_time(&item.published)
            ));
            if !item.summary.is_empty() {
                text.push_str(&format!("   {}\n", item.summary));
            }
            text.push_str(&format!("   {}\n\n", item.link));
        }

        text
    }
}

/// Plain text safe to place inside an HTML element.
pub fn safe_text(text: &str) -> String {
    html_escape::encode_text(&clean_text(text)).into_owned()
}
