//! Prompt text for the assistant endpoints.

use std::fmt::Write;

use crate::models::assistant::{
    CaptionRequest, ChatRequest, MAX_CAPTIONS, MAX_SUGGESTIONS, ProjectAnalysisRequest,
    TimeSuggestionRequest,
};

#[must_use]
pub fn time_suggestions(request: &TimeSuggestionRequest) -> String {
    let recent = if request.recent_activities.is_empty() {
        "none recorded".to_string()
    } else {
        request.recent_activities.join(", ")
    };

    format!(
        "You are a personal productivity coach. The user feels \"{mood}\" and has \
         {minutes} minutes available. Recent activities: {recent}.\n\
         Suggest up to {MAX_SUGGESTIONS} activities that fit within the available time \
         and suit the user's mood. Avoid repeating the recent activities.\n\
         Respond with JSON only, in this shape:\n\
         {{\"suggestions\": [{{\"title\": string, \"description\": string, \
         \"durationMinutes\": integer, \"category\": string}}]}}",
        mood = request.mood,
        minutes = request.available_minutes,
    )
}

#[must_use]
pub fn project_analysis(request: &ProjectAnalysisRequest) -> String {
    let project = &request.project;
    let mut prompt = String::from(
        "You are an experienced project manager. Analyse the project below.\n\nProject:\n",
    );

    let _ = writeln!(prompt, "- Name: {}", project.name);
    if let Some(status) = project.status {
        let _ = writeln!(prompt, "- Status: {}", enum_label(&status));
    }
    if let Some(progress) = project.progress {
        let _ = writeln!(prompt, "- Progress: {progress}%");
    }
    if let Some(deadline) = &project.deadline {
        let _ = writeln!(prompt, "- Deadline: {deadline}");
    }
    if let Some(description) = &project.description {
        let _ = writeln!(prompt, "- Description: {description}");
    }

    if request.tasks.is_empty() {
        prompt.push_str("\nTasks: none\n");
    } else {
        prompt.push_str("\nTasks:\n");
        for task in &request.tasks {
            let _ = write!(prompt, "- {}", task.title);
            if let Some(status) = task.status {
                let _ = write!(prompt, " [status: {}]", enum_label(&status));
            }
            if let Some(priority) = task.priority {
                let _ = write!(prompt, " [priority: {}]", enum_label(&priority));
            }
            if let Some(date) = &task.scheduled_date {
                let _ = write!(prompt, " [scheduled: {date}]");
            }
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "\nRespond with JSON only, in this shape:\n\
         {\"summary\": string, \"risks\": [string], \"recommendations\": [string], \
         \"nextSteps\": [string]}",
    );
    prompt
}

#[must_use]
pub fn captions(request: &CaptionRequest) -> String {
    let mut prompt = format!(
        "You write social media captions for the brand \"{}\".\n",
        request.brand
    );

    if let Some(platform) = &request.platform {
        let _ = writeln!(prompt, "Platform: {platform}");
    }
    if let Some(topic) = &request.topic {
        let _ = writeln!(prompt, "Topic: {topic}");
    }
    if !request.recent_posts.is_empty() {
        prompt.push_str("Match the voice of these recent posts:\n");
        for post in &request.recent_posts {
            let _ = writeln!(prompt, "- {post}");
        }
    }

    let _ = write!(
        prompt,
        "Write up to {MAX_CAPTIONS} distinct captions.\n\
         Respond with JSON only, in this shape:\n\
         {{\"captions\": [string]}}"
    );
    prompt
}

#[must_use]
pub fn chat(request: &ChatRequest) -> String {
    let mut prompt = String::from(
        "You are a friendly assistant inside a personal organizer app. \
         Answer concisely in plain text.\n\n",
    );

    for turn in &request.history {
        let _ = writeln!(prompt, "{}: {}", turn.role.label(), turn.content);
    }
    let _ = write!(prompt, "User: {}\nAssistant:", request.message);
    prompt
}

/// The wire name of a snake_case enum value.
fn enum_label<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use serde_json::json;

    #[test]
    fn test_time_suggestions_prompt() {
        let request: TimeSuggestionRequest = schema::insert(&json!({
            "mood": "tired",
            "availableMinutes": 25,
            "recentActivities": ["reading", "walk"]
        }))
        .unwrap();

        let prompt = time_suggestions(&request);
        assert!(prompt.contains("\"tired\""));
        assert!(prompt.contains("25 minutes"));
        assert!(prompt.contains("reading, walk"));
        assert!(prompt.contains("\"suggestions\""));
    }

    #[test]
    fn test_project_analysis_prompt_lists_tasks() {
        let request: ProjectAnalysisRequest = schema::insert(&json!({
            "project": { "name": "Garden", "status": "in_progress", "progress": 40 },
            "tasks": [
                { "title": "Buy seeds", "status": "completed" },
                { "title": "Build beds", "priority": "high", "scheduledDate": "2026-04-01" }
            ]
        }))
        .unwrap();

        let prompt = project_analysis(&request);
        assert!(prompt.contains("- Name: Garden"));
        assert!(prompt.contains("- Status: in_progress"));
        assert!(prompt.contains("- Progress: 40%"));
        assert!(prompt.contains("- Buy seeds [status: completed]"));
        assert!(prompt.contains("- Build beds [priority: high] [scheduled: 2026-04-01]"));
        assert!(!prompt.contains("Deadline"));
    }

    #[test]
    fn test_chat_prompt_keeps_turn_order() {
        let request: ChatRequest = schema::insert(&json!({
            "message": "And tomorrow?",
            "history": [
                { "role": "user", "content": "What is on today?" },
                { "role": "assistant", "content": "Two meetings." }
            ]
        }))
        .unwrap();

        let prompt = chat(&request);
        let first = prompt.find("User: What is on today?").unwrap();
        let second = prompt.find("Assistant: Two meetings.").unwrap();
        let last = prompt.find("User: And tomorrow?").unwrap();
        assert!(first < second && second < last);
        assert!(prompt.ends_with("Assistant:"));
    }
}
