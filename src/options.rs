//! Enumerated option sets for the social post form. Each set knows its
//! ordered variants, a display label, and how to cycle under arrow keys.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Topic,
    Url,
}

impl InputType {
    pub const ALL: [InputType; 2] = [InputType::Topic, InputType::Url];

    pub fn label(&self) -> &'static str {
        match self {
            InputType::Topic => "Subject / Topic",
            InputType::Url => "URL (Website/Video)",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            InputType::Topic => InputType::Url,
            InputType::Url => InputType::Topic,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            InputType::Topic => "e.g., The benefits of using our new productivity app",
            InputType::Url => "e.g., https://my-awesome-product.com/features",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    LinkedIn,
    Twitter,
    Instagram,
    Facebook,
    Blog,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Blog,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "X (Twitter)",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Blog => "Blog Post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Professional,
    Casual,
    Witty,
    Enthusiastic,
    Informative,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Witty,
        Tone::Enthusiastic,
        Tone::Informative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Witty => "Witty",
            Tone::Enthusiastic => "Enthusiastic",
            Tone::Informative => "Informative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Short,
    Medium,
    Long,
}

impl Length {
    pub const ALL: [Length; 3] = [Length::Short, Length::Medium, Length::Long];

    pub fn label(&self) -> &'static str {
        match self {
            Length::Short => "Short",
            Length::Medium => "Medium",
            Length::Long => "Long",
        }
    }
}

/// Cycle one step through `all`, wrapping at both ends.
pub fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_toggle_round_trip() {
        assert_eq!(InputType::Topic.toggle(), InputType::Url);
        assert_eq!(InputType::Url.toggle(), InputType::Topic);
    }

    #[test]
    fn test_cycle_forward_wraps() {
        assert_eq!(cycle(&Length::ALL, Length::Long, true), Length::Short);
    }

    #[test]
    fn test_cycle_backward_wraps() {
        assert_eq!(
            cycle(&Platform::ALL, Platform::LinkedIn, false),
            Platform::Blog
        );
    }

    #[test]
    fn test_cycle_forward_steps() {
        assert_eq!(cycle(&Tone::ALL, Tone::Professional, true), Tone::Casual);
    }

    #[test]
    fn test_labels_are_unique() {
        let labels: Vec<&str> = Platform::ALL.iter().map(|p| p.label()).collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels.len(), deduped.len());
    }
}
