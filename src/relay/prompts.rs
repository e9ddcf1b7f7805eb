//! Prompts for the vision and coaching models.

use super::model::{Analysis, MousePosition};
use crate::checklist::Step;

/// Build the screenshot analysis prompt.
///
/// When the cursor position is known, the model is told to focus on the
/// elements under it.
pub fn analysis_prompt(
    checklist_name: &str,
    step: &Step,
    mouse_position: Option<&MousePosition>,
) -> String {
    let mouse_context = match mouse_position.filter(|m| m.is_located()) {
        Some(m) => format!(
            "\nMOUSE CURSOR LOCATION: x={}, y={}\n\
             IMPORTANT: Focus your analysis on UI elements near these coordinates. \
             The user is hovering here, so this is what they're looking at right now.\n",
            m.x, m.y
        ),
        None => String::new(),
    };

    format!(
        "You are an AI Onboarding Coach analyzing a screenshot of a user completing the \
         {checklist_name} process.\n\n\
         Current onboarding step (Step {id}): {description}\n\
         {mouse_context}\n\
         Analyze the screenshot and provide:\n\
         1. What is currently visible on the screen?\n\
         2. Which form fields are visible?\n\
         3. Are there any error messages or warnings?\n\
         4. Has the user filled in any fields? Which ones?\n\
         5. What step of the onboarding process does this appear to be?\n\
         6. Are there any obvious mistakes or missing information?\n\n\
         Provide your analysis in JSON format with these fields:\n\
         {{\n\
         \x20   \"visible_elements\": [\"list of visible UI elements\"],\n\
         \x20   \"form_fields\": [\"list of visible form fields\"],\n\
         \x20   \"filled_fields\": [\"list of fields that appear to be filled\"],\n\
         \x20   \"errors_visible\": [\"list of any error messages shown\"],\n\
         \x20   \"current_page\": \"description of what page/step is shown\",\n\
         \x20   \"step_match\": true/false (does this match the expected step?),\n\
         \x20   \"issues_detected\": [\"list of any issues or mistakes\"]\n\
         }}",
        id = step.id,
        description = step.description,
    )
}

/// Build the coaching prompt for the current analysis and expected step.
pub fn coaching_prompt(checklist_name: &str, step: &Step, analysis: &Analysis) -> String {
    let current_page = if analysis.current_page.is_empty() {
        "Unknown"
    } else {
        analysis.current_page.as_str()
    };

    let visible = analysis
        .form_fields
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mouse_hint = match analysis.mouse_position.filter(|m| m.is_located()) {
        Some(m) => format!(" Their cursor is at ({}, {}).", m.x, m.y),
        None => String::new(),
    };

    format!(
        "You're coaching someone through: {checklist_name}\n\n\
         Expected Step {id}: {description}\n\
         Current page: {current_page}\n\
         Visible: {visible}\n\
         {mouse_hint}\n\n\
         Provide BRIEF coaching (2-3 sentences max):\n\
         1. Has the step been COMPLETED (action done, not just hovering)? If yes: \"correct\"\n\
         2. Are they hovering/looking at the right thing but haven't acted yet? If yes: \"incomplete\"\n\
         3. Are they on the wrong page/step? If yes: \"wrong_step\"\n\
         4. Is an error message blocking them? If yes: \"has_errors\"\n\n\
         \"correct\" means they COMPLETED the action. Just hovering = \"incomplete\".\n\n\
         Be specific and concise. Respond in JSON:\n\
         {{\n\
         \x20   \"step_status\": \"correct\" | \"wrong_step\" | \"has_errors\" | \"incomplete\",\n\
         \x20   \"message\": \"Brief 2-3 sentence message. If hovering over right element, say 'Good, now click it!'\"\n\
         }}\n\n\
         Keep it SHORT and actionable!",
        id = step.id,
        description = step.description,
    )
}
