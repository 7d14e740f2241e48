//! 链接归一化、去重与社交外链提取

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::profile::{AdditionalLink, SocialLinks, SocialPlatform};

static SOCIAL_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"https?://(?:www\.)?(facebook|instagram|linkedin|youtube|twitter|x|tiktok)\.com/[A-Za-z0-9_\-./@%]+"#,
    )
    .expect("invalid social url regex")
});

/// 提取URL的域名部分（去掉www.前缀）
pub fn extract_domain(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.contains('.') {
        Some(host.to_lowercase())
    } else {
        None
    }
}

/// 归一化URL用于去重比较：去掉query/fragment、结尾斜杠与www.前缀，域名小写
pub fn normalize_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let trimmed = without_query.trim_end_matches('/');

    match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
            let host = host.to_lowercase();
            let host = host.strip_prefix("www.").unwrap_or(&host);
            let mut normalized = format!("{}://{}", scheme.to_lowercase(), host);
            if !path.is_empty() {
                normalized.push('/');
                normalized.push_str(path);
            }
            normalized
        }
        None => trimmed.to_string(),
    }
}

/// 按归一化URL去重附加链接，保留首个出现的条目
pub fn dedupe_links(links: Vec<AdditionalLink>) -> Vec<AdditionalLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(normalize_url(&link.url)))
        .collect()
}

/// 从HTML文本中提取社交档案外链，每个平台取首个命中
///
/// 平台自身的分享/登录路径不算档案链接，据此排除。
pub fn extract_social_links(html: &str) -> SocialLinks {
    const NON_PROFILE_SEGMENTS: [&str; 6] =
        ["/sharer", "/share", "/intent", "/login", "/plugins", "/embed"];

    let mut links = SocialLinks::default();
    for capture in SOCIAL_URL_RE.captures_iter(html) {
        let url = capture.get(0).map(|m| m.as_str()).unwrap_or_default();
        let key = capture.get(1).map(|m| m.as_str()).unwrap_or_default();

        if NON_PROFILE_SEGMENTS.iter().any(|seg| url.contains(seg)) {
            continue;
        }
        let Some(platform) = SocialPlatform::from_key(key) else {
            continue;
        };
        if links.get(platform).is_none() {
            links.set(platform, normalize_url(url));
        }
    }
    links
}

/// 解析社交页面上的粉丝数文本（"12.5K"、"3,400"、"1.2M"）
pub fn parse_count(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }

    let (digits, multiplier) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        'b' | 'B' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| (v * multiplier) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::LinkCategory;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://www.acmeroofing.com/about?x=1"),
            Some("acmeroofing.com".to_string())
        );
        assert_eq!(
            extract_domain("http://Yelp.com/biz/acme"),
            Some("yelp.com".to_string())
        );
        assert_eq!(extract_domain("not a url"), None);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("HTTPS://Facebook.com/Acme/?utm_source=x#top"),
            "https://facebook.com/Acme"
        );
        assert_eq!(
            normalize_url("https://acme.com/services/"),
            "https://acme.com/services"
        );
        // www与非www视为同一地址
        assert_eq!(normalize_url("https://www.acme.com/"), "https://acme.com");
    }

    #[test]
    fn test_dedupe_collapses_www_variants() {
        let links = vec![
            AdditionalLink::ai_suggested(
                "A".into(),
                "https://www.homeadvisor.com/acme".into(),
                LinkCategory::Directory,
            ),
            AdditionalLink::ai_suggested(
                "B".into(),
                "https://homeadvisor.com/acme".into(),
                LinkCategory::Directory,
            ),
        ];

        let deduped = dedupe_links(links);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title, "A");
    }

    #[test]
    fn test_dedupe_links_by_normalized_url() {
        let links = vec![
            AdditionalLink::ai_suggested(
                "A".into(),
                "https://homeadvisor.com/acme/".into(),
                LinkCategory::Directory,
            ),
            AdditionalLink::ai_suggested(
                "B".into(),
                "https://homeadvisor.com/acme?ref=search".into(),
                LinkCategory::Directory,
            ),
            AdditionalLink::ai_suggested(
                "C".into(),
                "https://bbb.org/acme".into(),
                LinkCategory::ReviewPlatform,
            ),
        ];

        let deduped = dedupe_links(links);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "A");
    }

    #[test]
    fn test_extract_social_links_from_html() {
        let html = r#"
            <a href="https://www.facebook.com/acmeroofing">Facebook</a>
            <a href="https://facebook.com/other-profile">dup ignored</a>
            <a href="https://www.facebook.com/sharer/sharer.php?u=x">share ignored</a>
            <a href="https://www.youtube.com/@acmeroofing">YouTube</a>
            <a href="https://x.com/acme">X</a>
        "#;

        let links = extract_social_links(html);
        assert_eq!(
            links.facebook.as_deref(),
            Some("https://facebook.com/acmeroofing")
        );
        assert_eq!(
            links.youtube.as_deref(),
            Some("https://youtube.com/@acmeroofing")
        );
        // x.com归入twitter槽位
        assert_eq!(links.twitter.as_deref(), Some("https://x.com/acme"));
        assert!(links.instagram.is_none());
    }

    #[test]
    fn test_parse_count_variants() {
        assert_eq!(parse_count("12.5K"), Some(12_500));
        assert_eq!(parse_count("3,400"), Some(3_400));
        assert_eq!(parse_count("1.2M"), Some(1_200_000));
        assert_eq!(parse_count("987"), Some(987));
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count(""), None);
    }
}
