use serde::{Deserialize, Serialize};

use crate::error::ResearchError;

/// 调研请求 - 流水线的输入种子数据
///
/// 不变量：公司名称与网站地址至少存在一个，否则流水线必须快速失败。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    /// 公司网站地址
    pub website_url: Option<String>,
    /// 公司名称
    pub company_name: Option<String>,
    /// 所在地（城市/地区）
    pub location: Option<String>,
    /// 行业提示（roofing、hvac、plumbing等）
    pub industry_type: Option<String>,
}

impl ResearchRequest {
    pub fn new(
        website_url: Option<String>,
        company_name: Option<String>,
        location: Option<String>,
        industry_type: Option<String>,
    ) -> Self {
        Self {
            website_url: normalize_field(website_url),
            company_name: normalize_field(company_name),
            location: normalize_field(location),
            industry_type: normalize_field(industry_type),
        }
    }

    /// 校验请求是否满足启动流水线的最低要求
    pub fn validate(&self) -> Result<(), ResearchError> {
        if self.website_url.is_none() && self.company_name.is_none() {
            return Err(ResearchError::InvalidRequest(
                "公司名称与网站地址至少需要提供一个".to_string(),
            ));
        }
        Ok(())
    }

    /// 调研对象的展示名称，名称缺失时退回到网站域名
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.company_name {
            return name.clone();
        }
        self.website_url
            .as_deref()
            .and_then(crate::utils::links::extract_domain)
            .unwrap_or_else(|| "unknown company".to_string())
    }
}

fn normalize_field(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_name_or_website() {
        let request = ResearchRequest::new(None, None, Some("Austin, TX".into()), None);
        assert!(matches!(
            request.validate(),
            Err(ResearchError::InvalidRequest(_))
        ));

        let with_name = ResearchRequest::new(None, Some("Acme Roofing".into()), None, None);
        assert!(with_name.validate().is_ok());

        let with_site = ResearchRequest::new(Some("https://acme.com".into()), None, None, None);
        assert!(with_site.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_are_normalized_to_none() {
        let request = ResearchRequest::new(Some("   ".into()), Some("".into()), None, None);
        assert!(request.website_url.is_none());
        assert!(request.company_name.is_none());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_domain() {
        let request =
            ResearchRequest::new(Some("https://www.acmeroofing.com/about".into()), None, None, None);
        assert_eq!(request.display_name(), "acmeroofing.com");
    }
}
