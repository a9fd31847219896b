/// What a handler asks the page to do once its request has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Alert(String),
    Reload,
    Navigate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects(Vec<Effect>);

impl Effects {
    pub fn alert(message: impl Into<String>) -> Self {
        Self(vec![Effect::Alert(message.into())])
    }

    pub fn then(mut self, effect: Effect) -> Self {
        self.0.push(effect);
        self
    }

    pub fn alerts(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|effect| match effect {
            Effect::Alert(message) => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn navigation(&self) -> Option<&str> {
        self.0.iter().find_map(|effect| match effect {
            Effect::Navigate(path) => Some(path.as_str()),
            _ => None,
        })
    }

    pub fn reloads(&self) -> bool {
        self.0.contains(&Effect::Reload)
    }
}

impl From<Effect> for Effects {
    fn from(effect: Effect) -> Self {
        Self(vec![effect])
    }
}
