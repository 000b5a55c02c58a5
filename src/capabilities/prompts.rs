// src/capabilities/prompts.rs
//! Prompt templates sent to the provider

/// Thumbnail prompt used by the full generation flow
pub fn thumbnail_prompt(topic: &str) -> String {
    format!(
        "A compelling YouTube thumbnail for a video about: \"{}\". Ensure it's visually appealing, high-resolution (1280x720), and click-worthy for a YouTube video format.",
        topic
    )
}

/// Thumbnail prompt used when a single thumbnail is regenerated from the
/// review screen, where the current title may differ from the original one
pub fn regenerated_thumbnail_prompt(title: Option<&str>, topic: &str) -> String {
    let topic = if topic.trim().is_empty() {
        "the video content"
    } else {
        topic.trim()
    };

    let mut prompt = String::from("A compelling YouTube thumbnail (1280x720 pixels)");
    if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!(" for a video titled \"{}\"", title));
    }
    prompt.push_str(&format!(
        " based on the topic: \"{}\". Ensure it's visually appealing, high-resolution, and click-worthy for a YouTube video format.",
        topic
    ));
    prompt
}

pub fn title_and_description_prompt(prompt: &str) -> String {
    format!(
        "You are a video marketing expert. Generate a compelling title and SEO-optimized description for a video based on the following prompt:

Prompt: {}

Respond with a JSON object containing \"title\" and \"description\".",
        prompt
    )
}

pub fn script_prompt(prompt: &str) -> String {
    format!(
        "You are a professional YouTube scriptwriter. Write an engaging, well-structured video script based on the following prompt:

Prompt: {}

The script should include:
- A strong hook in the first few seconds
- Clear main content with natural pacing
- A memorable conclusion and call to action

Write only the words that will be spoken, with no stage directions or formatting.",
        prompt
    )
}

pub fn captions_prompt(script: &str) -> String {
    format!(
        "You are an expert in video production and captioning.
Given the following video script, convert it into SRT (SubRip Text) format.

Video Script:
{}

Instructions for SRT generation:
1.  Break the script into logical caption segments. Each segment should represent a few seconds of speech.
2.  Assign a sequence number to each caption block, starting from 1.
3.  Assign plausible start and end timestamps for each caption block in the format HH:MM:SS,mmm (hours:minutes:seconds,milliseconds).
    - Assume a normal speaking pace for the script. Estimate the timings based on the length of the script segments.
    - Ensure timestamps are sequential and do not overlap.
4.  The final output must be a valid SRT formatted string. Each entry should look like:
    sequence_number
    HH:MM:SS,mmm --> HH:MM:SS,mmm
    Caption text line 1
    (Optional caption text line 2)

    (Blank line separating entries)

Ensure the entire script is covered.
Do not add any commentary or explanations outside of the SRT formatted text itself.
Output only the SRT formatted string.",
        script
    )
}

pub fn storyboard_prompt(script: &str, max_scenes: u32) -> String {
    format!(
        "You are an expert storyboard artist for video production.
Given the following video script, break it down into a sequence of distinct visual scenes.
For each scene:
1. Assign a sequential 'sceneNumber', starting from 1.
2. Provide a concise 'description' of what should be visually represented in that scene. This description should be suitable for an AI image generator to create a compelling visual for that part of the script. Focus on key actions, characters, settings, or objects.
Limit the number of scenes to a maximum of {}. If the script is short, generate fewer scenes.

Video Script:
{}

Output ONLY the structured list of scenes.",
        max_scenes, script
    )
}

pub fn scene_image_prompt(scene_description: &str, video_topic: &str) -> String {
    format!(
        "Create a visually compelling, HD-quality image (aiming for 1280x720 aspect ratio) for a video scene.
Scene description: \"{}\"
The overall video is about: \"{}\"
The image should be suitable as a visual in a YouTube video. Cinematic style.",
        scene_description, video_topic
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_prompt_embeds_topic_and_style_hints() {
        let prompt = thumbnail_prompt("A 5-minute tutorial on sourdough bread");
        assert!(prompt.contains("\"A 5-minute tutorial on sourdough bread\""));
        assert!(prompt.contains("1280x720"));
        assert!(prompt.contains("click-worthy"));
    }

    #[test]
    fn test_regenerated_thumbnail_prompt_uses_title_when_present() {
        let prompt = regenerated_thumbnail_prompt(Some("Perfect Sourdough"), "sourdough");
        assert!(prompt.contains("for a video titled \"Perfect Sourdough\""));
        assert!(prompt.contains("based on the topic: \"sourdough\""));

        let untitled = regenerated_thumbnail_prompt(Some("  "), "");
        assert!(!untitled.contains("titled"));
        assert!(untitled.contains("based on the topic: \"the video content\""));
    }
}
