use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::types::profile::CompanyProfile;
use crate::types::quality::{ConfidenceMap, DataQualityAssessment};

/// 深度调研结果报告
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchReport {
    pub profile: CompanyProfile,
    pub confidence: ConfidenceMap,
    pub data_quality: DataQualityAssessment,
    /// 各阶段累积的证据来源URL/查询
    pub research_sources: Vec<String>,
    /// 策略员与各阶段的过程备注
    pub ai_team_notes: Vec<String>,
}

impl ResearchReport {
    /// 展开为对外的线格式（成功分支）
    ///
    /// 社交链接、附加链接等字段在顶层重复暴露，供仅关心局部结果的
    /// 前端消费方直接取用。
    pub fn to_wire(&self) -> serde_json::Value {
        json!({
            "success": true,
            "profile": self.profile,
            "socialLinks": self.profile.social_links,
            "additionalLinks": self.profile.additional_links,
            "competitorAnalysis": self.profile.competitor_analysis,
            "seoInsights": self.profile.seo_insights,
            "conversionInsights": self.profile.conversion_insights,
            "confidence": self.confidence,
            "researchSources": self.research_sources,
            "aiTeamNotes": self.ai_team_notes,
            "missingFields": self.data_quality.missing_fields,
            "dataQuality": self.data_quality,
        })
    }

    /// 失败分支的线格式
    pub fn failure_wire(error: &str) -> serde_json::Value {
        json!({
            "success": false,
            "error": error,
        })
    }
}

/// 快速调研的单字段建议
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSuggestion {
    pub field: String,
    pub value: String,
    /// 建议的置信度，0-100
    pub confidence: u8,
}

/// 快速调研结果 - 仅针对已有档案的缺失字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickResearchReport {
    pub suggestions: Vec<FieldSuggestion>,
    pub fields_found: Vec<String>,
    pub sources_used: Vec<String>,
}
