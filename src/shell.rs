//! 対話モード
//!
//! 在庫テーブルを表示し、1行コマンドで追加・検索・ページ移動・数量増減・削除・撮影を行う。

use crate::camera::CameraSource;
use crate::error::{PantryError, Result};
use crate::render;
use crate::session::Session;
use dialoguer::{Input, Select};
use pantry_ai_common::WeightUnit;
use std::path::PathBuf;

const HELP: &str = "\
  a           追加（フォーム入力）
  p [PATH]    撮影して品名を自動入力（PATH省略時は取り込みフォルダ）
  s TERM      品名で検索（完全一致）
  r           検索解除
  n / b       次/前のページ
  g N         Nページへ
  + ID / - ID 数量を1増減
  d ID        削除
  h           ヘルプ
  q           終了";

/// 対話アクション
#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    Add,
    Photo(Option<PathBuf>),
    Search(String),
    Reset,
    NextPage,
    PrevPage,
    GoTo(usize),
    Increment(String),
    Decrement(String),
    Delete(String),
    Help,
    Refresh,
    Quit,
    Unknown(String),
}

/// 入力行をアクションに変換
pub fn parse_action(input: &str) -> ShellAction {
    let trimmed = input.trim();
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match (command, rest) {
        ("", _) => ShellAction::Refresh,
        ("a" | "add", _) => ShellAction::Add,
        ("p" | "photo", "") => ShellAction::Photo(None),
        ("p" | "photo", path) => ShellAction::Photo(Some(PathBuf::from(path))),
        ("s" | "search", term) if !term.is_empty() => ShellAction::Search(term.to_string()),
        ("r" | "reset", _) => ShellAction::Reset,
        ("n" | "next", _) => ShellAction::NextPage,
        ("b" | "prev", _) => ShellAction::PrevPage,
        ("g" | "page", n) => match n.parse::<usize>() {
            Ok(page) => ShellAction::GoTo(page),
            Err(_) => ShellAction::Unknown(trimmed.to_string()),
        },
        ("+", id) if !id.is_empty() => ShellAction::Increment(id.to_string()),
        ("-", id) if !id.is_empty() => ShellAction::Decrement(id.to_string()),
        ("d" | "delete", id) if !id.is_empty() => ShellAction::Delete(id.to_string()),
        ("h" | "help" | "?", _) => ShellAction::Help,
        ("q" | "quit" | "exit", _) => ShellAction::Quit,
        _ => ShellAction::Unknown(trimmed.to_string()),
    }
}

/// 対話モードを実行
pub async fn run_shell(session: &mut Session) -> Result<()> {
    println!("{}\n", HELP);

    loop {
        session.refresh();
        println!("{}", render::render_table(session.state()));
        if let Some(message) = render::render_error(session.state()) {
            println!("{}\n", message);
        }

        let input: String = Input::new()
            .with_prompt("pantry")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PantryError::Prompt(e.to_string()))?;

        match parse_action(&input) {
            ShellAction::Add => {
                prompt_form(session)?;
                session.controller_mut().add_item().await;
            }
            ShellAction::Photo(path) => {
                let source = match path.or_else(|| session.config().camera_folder.clone()) {
                    Some(path) if path.is_dir() => CameraSource::Folder(path),
                    Some(path) => CameraSource::File(path),
                    None => CameraSource::File(prompt_path()?),
                };
                match session.capture(&source).await {
                    Ok(()) if session.state().error().is_none() => {
                        println!("✔ 分類結果: {}", session.state().form.item);
                    }
                    Ok(()) => {}
                    Err(e) => println!("✖ {}", e),
                }
            }
            ShellAction::Search(term) => {
                session.controller_mut().search_for(term).await;
            }
            ShellAction::Reset => session.controller_mut().reset_search(),
            ShellAction::NextPage => session.controller_mut().state_mut().next_page(),
            ShellAction::PrevPage => session.controller_mut().state_mut().prev_page(),
            ShellAction::GoTo(page) => session.controller_mut().set_page(page),
            ShellAction::Increment(id) => {
                session.controller_mut().increment(&id).await;
            }
            ShellAction::Decrement(id) => {
                session.controller_mut().decrement(&id).await;
            }
            ShellAction::Delete(id) => {
                session.controller_mut().delete_item(&id).await;
            }
            ShellAction::Help => println!("{}\n", HELP),
            ShellAction::Refresh => {}
            ShellAction::Quit => break,
            ShellAction::Unknown(input) => println!("⚠ 不明なコマンド: {} (h でヘルプ)\n", input),
        }
    }

    session.shutdown();
    Ok(())
}

/// フォーム入力（現在値を初期値として表示）
fn prompt_form(session: &mut Session) -> Result<()> {
    let form = session.controller().state().form.clone();

    let item = prompt_text("Item", &form.item)?;
    let quantity = prompt_text("Quantity", &form.quantity)?;
    let weight = prompt_text("Weight", &form.weight)?;

    let labels: Vec<&str> = WeightUnit::ALL.iter().map(|u| u.as_str()).collect();
    let default = labels
        .iter()
        .position(|l| *l == form.weight_unit)
        .unwrap_or(0);
    let unit = Select::new()
        .with_prompt("Weight unit")
        .items(&labels)
        .default(default)
        .interact()
        .map_err(|e| PantryError::Prompt(e.to_string()))?;

    let form = session.controller_mut().form_mut();
    form.item = item;
    form.quantity = quantity;
    form.weight = weight;
    form.weight_unit = labels[unit].to_string();
    Ok(())
}

fn prompt_text(prompt: &str, initial: &str) -> Result<String> {
    Input::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PantryError::Prompt(e.to_string()))
}

fn prompt_path() -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("写真ファイル")
        .interact_text()
        .map_err(|e| PantryError::Prompt(e.to_string()))?;
    Ok(PathBuf::from(input.trim()))
}
