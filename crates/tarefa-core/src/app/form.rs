use crate::domain::{NewTask, Prioridade};

/// TaskForm は作成フォームの入力値
///
/// 検証はしません。空のまま送信することもできます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub titulo: String,
    pub descricao: String,
    /// None は「Selecione」（未選択）
    pub prioridade: Option<Prioridade>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_titulo(&mut self, value: impl Into<String>) {
        self.titulo = value.into();
    }

    pub fn set_descricao(&mut self, value: impl Into<String>) {
        self.descricao = value.into();
    }

    pub fn set_prioridade(&mut self, value: Option<Prioridade>) {
        self.prioridade = value;
    }

    /// 3 つのフィールドをすべて空に戻す
    pub fn reset(&mut self) {
        self.titulo.clear();
        self.descricao.clear();
        self.prioridade = None;
    }

    pub fn is_empty(&self) -> bool {
        self.titulo.is_empty() && self.descricao.is_empty() && self.prioridade.is_none()
    }

    pub fn to_new_task(&self) -> NewTask {
        NewTask::new(self.titulo.clone(), self.descricao.clone(), self.prioridade)
    }
}
