//! 字段置信度评分表
//!
//! 确定性评分，不经过模型。数值是固定查表项而非可重新发明的启发式，
//! 前端置信度条依赖其跨运行的一致性，修改任何常量都是行为变更。

use crate::types::profile::CompanyProfile;
use crate::types::quality::ConfidenceMap;

const PRESENCE_SCORES: [(&str, u8); 11] = [
    ("name", 95),
    ("tagline", 70),
    ("website", 90),
    ("phone", 85),
    ("email", 85),
    ("address", 80),
    ("city", 75),
    ("state", 75),
    ("zip", 70),
    ("industry", 75),
    ("audience", 70),
];

/// 列表字段：基础分 + 每项加分，封顶
fn list_score(count: usize, base: u8, per_item: u8, cap: u8) -> u8 {
    if count == 0 {
        return 0;
    }
    let raw = base as usize + count * per_item as usize;
    raw.min(cap as usize) as u8
}

/// 为结构化后的档案计算各字段的0-100置信度
pub fn score_profile(profile: &CompanyProfile) -> ConfidenceMap {
    let mut confidence = ConfidenceMap::new();

    let presence_value = |key: &str| -> Option<&Option<String>> {
        match key {
            "name" => Some(&profile.name),
            "tagline" => Some(&profile.tagline),
            "website" => Some(&profile.website),
            "phone" => Some(&profile.phone),
            "email" => Some(&profile.email),
            "address" => Some(&profile.address),
            "city" => Some(&profile.city),
            "state" => Some(&profile.state),
            "zip" => Some(&profile.zip),
            "industry" => Some(&profile.industry),
            "audience" => Some(&profile.audience),
            _ => None,
        }
    };

    for (key, score) in PRESENCE_SCORES {
        let filled = presence_value(key).is_some_and(|v| v.is_some());
        confidence.insert(key.to_string(), if filled { score } else { 0 });
    }

    confidence.insert(
        "services".to_string(),
        list_score(profile.services.len(), 60, 5, 90),
    );
    confidence.insert(
        "usps".to_string(),
        list_score(profile.usps.len(), 55, 5, 85),
    );
    confidence.insert(
        "certifications".to_string(),
        list_score(profile.certifications.len(), 50, 10, 80),
    );
    confidence.insert(
        "awards".to_string(),
        list_score(profile.awards.len(), 50, 10, 80),
    );

    // 存在即得固定分的布尔派生字段
    confidence.insert(
        "socialLinks".to_string(),
        if profile.social_links.is_empty() { 0 } else { 80 },
    );
    confidence.insert(
        "additionalLinks".to_string(),
        if profile.additional_links.is_empty() { 0 } else { 75 },
    );
    confidence.insert(
        "competitors".to_string(),
        if profile.competitor_analysis.competitors.is_empty() {
            0
        } else {
            75
        },
    );

    confidence
}
