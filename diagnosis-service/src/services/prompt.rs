//! Prompt assembly.
//!
//! The instruction block is fixed; only the user's description and the
//! optional image vary per request.

use crate::services::images::DecodedImage;

/// One ordered piece of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Image(DecodedImage),
}

/// Input for a single generation call: instructions first, image second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
    pub segments: Vec<Segment>,
}

impl GenerationInput {
    pub fn has_image(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Image(_)))
    }

    pub fn text_len(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.len(),
                Segment::Image(_) => 0,
            })
            .sum()
    }
}

const INSTRUCTIONS: &str = r#"You are a careful health triage assistant. Your job is to give preliminary, general guidance about a user's health complaint, based on their description and any photo they attach, and to tell them what kind of care to seek next.

Place the complaint in exactly one of these severity tiers:
1.  **Basic/Minor:** manageable with home care or self-care.
2.  **Moderate:** the user should consult a general practitioner or a clinic.
3.  **Severe/Emergency:** the user needs immediate professional medical attention (emergency room, emergency services).

Rules:
-   **The first line of your reply must be "Severity: [Basic/Moderate/Severe]".**
-   **The next line must be "Advice:", followed by your advice.**
-   Format the advice in Markdown: bullet points for lists, bold for emphasis, headings for sections.
-   For Basic problems, give practical home-care steps, over-the-counter options and general wellness tips.
-   For Moderate problems, recommend seeing a doctor and list what to prepare: symptom history, duration, related factors, current medications.
-   For Severe problems, urge the user to get emergency help right away and explain why they must not wait.
-   **Be cautious.** When the tier is unclear or the input is ambiguous, pick the more serious tier and recommend professional consultation.
-   **Do NOT diagnose.** Advise only on next steps for care.
-   **Do NOT give dosages for prescription medication.**
-   Keep the advice short, clear and in plain language.

Example reply:
Severity: Basic
Advice:
Based on your description of a common cold:
*   **Rest:** Sleep as much as you can so your body can recover.
*   **Fluids:** Drink water, herbal tea and broth to stay hydrated.
*   **Over-the-counter:** Decongestants or pain relievers can ease symptoms.
*   **When to see a doctor:** If symptoms get worse or last longer than a week, see a general practitioner."#;

const WITH_IMAGE: &str = "An image is attached after this text. Refer to what the image shows in your advice.";

const WITHOUT_IMAGE: &str = "No image is attached. Start the advice with \"Based on your description...\" to make clear it relies on the text alone.";

/// Builds the instruction segment, followed by the image segment when present.
pub fn build_prompt(problem_text: &str, image: Option<DecodedImage>) -> GenerationInput {
    let image_rule = if image.is_some() {
        WITH_IMAGE
    } else {
        WITHOUT_IMAGE
    };

    let text = format!(
        "{INSTRUCTIONS}\n\n{image_rule}\n\nUser's health problem description: \"{problem_text}\"\n"
    );

    let mut segments = vec![Segment::Text(text)];
    if let Some(image) = image {
        segments.push(Segment::Image(image));
    }

    GenerationInput { segments }
}
