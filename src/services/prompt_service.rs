//! Prompt 构建服务
//!
//! 负责把医生的原始笔记包装成临床文档生成请求

use crate::llm::ChatMessage;

/// 系统提示词
const SYSTEM_PROMPT: &str = r#"You are a medical documentation assistant. Your task is to transform raw medical notes into professional, structured clinical documentation.

Guidelines:
1. Use proper medical terminology and formatting
2. Structure the output with clear sections (Chief Complaint, History, Physical Exam, Assessment, Plan)
3. Maintain patient confidentiality and professionalism
4. Ensure accuracy and completeness
5. Use standard medical abbreviations where appropriate
6. Format as a proper clinical note

Output format:
**CHIEF COMPLAINT:**
[Patient's main concern]

**HISTORY OF PRESENT ILLNESS:**
[Detailed description of symptoms, onset, duration, severity, associated symptoms]

**REVIEW OF SYSTEMS:**
[Relevant system review]

**PHYSICAL EXAMINATION:**
[Detailed physical findings organized by system]

**ASSESSMENT AND PLAN:**
[Diagnosis and treatment plan]

**MEDICATIONS:**
[Current medications if mentioned]

**FOLLOW-UP:**
[Follow-up instructions]"#;

/// 用户消息前缀
const USER_PREFIX: &str =
    "Please convert these medical notes into professional clinical documentation:";

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建文档生成消息列表
    pub fn build_documentation_messages(&self, notes: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("{}\n\n{}", USER_PREFIX, notes)),
        ]
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_documentation_messages() {
        let service = PromptService::new();
        let messages = service.build_documentation_messages("45M chest pain x2h");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("**ASSESSMENT AND PLAN:**"));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.ends_with("\n\n45M chest pain x2h"));
    }
}
