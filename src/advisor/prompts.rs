//! Prompt builders for the startup-advisor completions.

use crate::flow::Response;

/// System prompt for follow-up question generation.
pub const FOLLOW_UP_SYSTEM: &str = "You are an experienced startup advisor. Based on the user's \
answer, generate ONE insightful follow-up question that will help you better understand their \
startup. Keep it conversational and specific to their response. Don't repeat information they've \
already provided.";

/// System prompt for the short encouragement note shown between questions.
pub const ENCOURAGEMENT_SYSTEM: &str = "You are a helpful startup advisor. Provide a brief, \
encouraging response that shows you understand their answer and builds confidence for the next \
question. Keep it under 50 words and maintain a supportive tone.";

/// System prompt for the synchronous final analysis.
pub const ANALYSIS_SYSTEM: &str = "You are an expert startup advisor. Based on all the onboarding \
responses, provide a comprehensive analysis with clear recommendations on whether they should \
BUILD, PIVOT, or KILL their startup idea. Be honest but constructive.";

/// Build the follow-up generation prompt from the current step and all prior
/// committed responses.
pub fn follow_up_prompt(question: &str, answer: &str, prior: &[Response]) -> String {
    let context: String = prior
        .iter()
        .map(|r| format!("Q: {} - A: {}", r.question_id, r.answer))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Context from previous answers:\n{context}\n\n\
         Current Question: {question}\n\
         User's Answer: {answer}\n\n\
         Generate a thoughtful follow-up question that digs deeper into their response:"
    )
}

/// Build the encouragement prompt for a just-answered step.
pub fn encouragement_prompt(question: &str, answer: &str, follow_up_answer: Option<&str>) -> String {
    let follow_up = match follow_up_answer {
        Some(text) => format!("Follow-up Answer: {text}\n"),
        None => String::new(),
    };

    format!(
        "Question: {question}\n\
         Answer: {answer}\n\
         {follow_up}\n\
         Provide a brief, supportive response:"
    )
}

/// Build the final-analysis prompt over the full response set.
pub fn analysis_prompt(responses: &[Response]) -> String {
    let answers: String = responses
        .iter()
        .map(|r| {
            let follow_up = r
                .follow_up_answer
                .as_deref()
                .map(|f| format!(" | Follow-up: {f}"))
                .unwrap_or_default();
            format!("Q{}: {}{}", r.question_id, r.answer, follow_up)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze this startup based on their onboarding responses:\n\n\
         {answers}\n\n\
         Provide a detailed analysis covering:\n\
         1. Market Opportunity Assessment\n\
         2. Product-Market Fit Potential\n\
         3. Competitive Advantage\n\
         4. Validation Status\n\
         5. Key Risks & Challenges\n\
         6. Final Recommendation: BUILD / PIVOT / KILL\n\
         7. Next Steps\n\n\
         Be specific and actionable in your advice."
    )
}
