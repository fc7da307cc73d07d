//! System instruction for drug-possession extraction

use crate::types::ChatMessage;
use drugledger_domain::CaseRecord;

/// The fixed system instruction sent with every case
///
/// Constructed once at startup and shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt {
    text: String,
}

impl SystemPrompt {
    /// Create a prompt from custom instruction text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Instruction text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Two-message conversation for one case: system rules, then the judgment
    pub fn conversation(&self, case: &CaseRecord) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.text.clone()),
            ChatMessage::user(case.user_message()),
        ]
    }
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new(EXTRACTION_INSTRUCTIONS)
    }
}

// Net weight over gross weight, grams only, alias table, no extra fields.
const EXTRACTION_INSTRUCTIONS: &str = "你是法律信息抽取助手。只从文本中抽取已查明的毒品名称与净重量，
严格区分毛重/净重，多个表述以净重为准；无法确定的数量不要臆测。
输出遵循给定JSON架构。
若文中仅有毛重，amount_grams填0，并在notes说明。
对别名：冰毒=甲基苯丙胺；K粉=氯胺酮；麻古=复方（若无法拆分则按判决归类）；海洛因=二乙酰吗啡。
单位统一转换为克；mg→÷1000, kg→×1000。
返回 JSON 对象，字段严格包含：case_id, drugs[{name_std,name_raw,amount_grams,unit_raw,amount_raw_text,evidence_span,certainty}], totals{amount_grams_sum}, notes；不得输出多余字段。
";
