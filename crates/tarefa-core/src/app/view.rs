//! View - (state, session, tasks, form) → View の純粋関数
//!
//! # 領域
//! - header: アバター・名前・メール・ログアウト
//! - form: 作成フォーム（ADMIN のみ）
//! - table: Título / Descrição / Prioridade / Usuário（ADMIN は「Ações」列と「Excluir」ボタン）
//!
//! 表示判定（ADMIN かどうか）は毎回ここで計算し直します。保存はしません。
//! 並び替え・絞り込み・ページングはしません。

use std::fmt;

use super::form::TaskForm;
use crate::domain::{Prioridade, Session, Task, TaskId, ViewState};

pub const LOGOUT_LABEL: &str = "Log Out";
pub const SUBMIT_LABEL: &str = "Cadastrar";
pub const DELETE_LABEL: &str = "Excluir";
pub const ACTIONS_COLUMN: &str = "Ações";

const BASE_COLUMNS: [&str; 4] = ["Título", "Descrição", "Prioridade", "Usuário"];

/// View は描画結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Ready 以外: "Loading ..." / "Redirecionando para login..."
    Placeholder(&'static str),
    Page(Page),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub header: Header,
    pub form: Option<FormView>,
    pub table: TableView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub avatar: String,
    pub name: String,
    pub email: String,
    pub logout: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub titulo: String,
    pub descricao: String,
    pub prioridade: Option<Prioridade>,
    pub submit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: TaskId,
    pub titulo: String,
    pub descricao: String,
    pub prioridade: String,
    pub email: String,
    /// ADMIN のときだけ Some("Excluir")
    pub delete: Option<&'static str>,
}

impl View {
    pub fn page(&self) -> Option<&Page> {
        match self {
            View::Page(page) => Some(page),
            View::Placeholder(_) => None,
        }
    }

    /// 作成フォームが表示されているか
    pub fn has_create_form(&self) -> bool {
        self.page().is_some_and(|p| p.form.is_some())
    }

    /// 「Ações」列が表示されているか
    pub fn has_actions_column(&self) -> bool {
        self.page()
            .is_some_and(|p| p.table.columns.contains(&ACTIONS_COLUMN))
    }

    /// 削除ボタンの数
    pub fn delete_buttons(&self) -> usize {
        self.page()
            .map(|p| p.table.rows.iter().filter(|r| r.delete.is_some()).count())
            .unwrap_or(0)
    }
}

/// 状態から View を組み立てる
pub fn render(state: ViewState, session: Option<&Session>, tasks: &[Task], form: &TaskForm) -> View {
    let session = match (state, session) {
        (ViewState::Ready, Some(session)) => session,
        (state, _) => {
            return View::Placeholder(
                state
                    .placeholder()
                    .unwrap_or("Redirecionando para login..."),
            );
        }
    };

    let admin = session.is_admin();

    let header = Header {
        avatar: session.user.picture.clone(),
        name: session.user.name.clone(),
        email: session.user.email.clone(),
        logout: LOGOUT_LABEL,
    };

    let form = admin.then(|| FormView {
        titulo: form.titulo.clone(),
        descricao: form.descricao.clone(),
        prioridade: form.prioridade,
        submit: SUBMIT_LABEL,
    });

    let mut columns = BASE_COLUMNS.to_vec();
    if admin {
        columns.push(ACTIONS_COLUMN);
    }

    let rows = tasks
        .iter()
        .map(|t| RowView {
            id: t.id.clone(),
            titulo: t.titulo.clone(),
            descricao: t.descricao.clone(),
            prioridade: t.prioridade.map(|p| p.to_string()).unwrap_or_default(),
            email: t.email.clone(),
            delete: admin.then_some(DELETE_LABEL),
        })
        .collect();

    View::Page(Page {
        header,
        form,
        table: TableView { columns, rows },
    })
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = match self {
            View::Placeholder(msg) => return writeln!(f, "{msg}"),
            View::Page(page) => page,
        };

        let h = &page.header;
        writeln!(f, "{} <{}>  [{}]", h.name, h.email, h.logout)?;
        if !h.avatar.is_empty() {
            writeln!(f, "avatar: {}", h.avatar)?;
        }
        writeln!(f)?;

        if let Some(form) = &page.form {
            writeln!(f, "== Cadastrar Tarefa ==")?;
            writeln!(f, "Título: {}", form.titulo)?;
            writeln!(f, "Descrição: {}", form.descricao)?;
            let selected = form.prioridade.map(|p| p.label()).unwrap_or("Selecione");
            let options: Vec<&str> = Prioridade::ALL.iter().map(|p| p.label()).collect();
            writeln!(f, "Prioridade: {selected} ({})", options.join(" / "))?;
            writeln!(f, "[{}]", form.submit)?;
            writeln!(f)?;
        }

        writeln!(f, "== Lista de Tarefas ==")?;
        let mut header = vec!["#"];
        header.extend(page.table.columns.iter().copied());
        writeln!(f, "{}", header.join(" | "))?;
        for row in &page.table.rows {
            let id = row.id.to_string();
            let mut cells = vec![
                id.as_str(),
                row.titulo.as_str(),
                row.descricao.as_str(),
                row.prioridade.as_str(),
                row.email.as_str(),
            ];
            if let Some(label) = row.delete {
                cells.push(label);
            }
            writeln!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}
