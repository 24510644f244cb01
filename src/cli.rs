use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pantry-ai")]
#[command(about = "食品在庫トラッカー（写真からの品名自動入力つき）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 在庫ファイル（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 在庫一覧を表示（5件/ページ）
    List {
        /// ページ番号（1から）
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// 品名の完全一致で絞り込み
        #[arg(short, long)]
        search: Option<String>,
    },

    /// 在庫を追加
    Add {
        /// 品名（写真を使う場合は分類結果で上書き）
        #[arg(short, long, default_value = "")]
        item: String,

        /// 数量
        #[arg(short, long)]
        quantity: String,

        /// 重量
        #[arg(short, long)]
        weight: String,

        /// 単位 (kg/pound/litre/milliliter/gram/tablespoon/"serving size")
        #[arg(short, long, default_value = "kg")]
        unit: String,

        /// 写真ファイル（分類して品名を自動入力）
        #[arg(long, conflicts_with = "camera")]
        photo: Option<PathBuf>,

        /// 取り込みフォルダの最新画像を撮影として使う
        #[arg(long)]
        camera: bool,
    },

    /// 数量を1増やす
    Inc {
        /// ドキュメントid
        id: String,
    },

    /// 数量を1減らす
    Dec {
        /// ドキュメントid
        id: String,
    },

    /// 数量を指定値にする
    SetQuantity {
        /// ドキュメントid
        id: String,

        /// 新しい数量
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },

    /// 在庫を削除
    Delete {
        /// ドキュメントid
        id: String,
    },

    /// 品名で検索（完全一致）
    Search {
        /// 品名
        #[arg(required = true)]
        term: String,

        /// ページ番号
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// 画像を分類してラベルを表示
    Classify {
        /// 画像ファイル
        #[arg(required = true)]
        photo: PathBuf,
    },

    /// 対話モード
    Shell,

    /// 設定
    Config {
        /// 在庫ファイルの場所を設定
        #[arg(long)]
        set_store: Option<PathBuf>,

        /// 分類コマンドを設定（以降の引数はコマンド引数）
        #[arg(long, num_args = 1.., value_name = "COMMAND [ARGS]...", allow_hyphen_values = true)]
        set_classifier: Option<Vec<String>>,

        /// 撮影画像の取り込みフォルダを設定
        #[arg(long)]
        set_camera_folder: Option<PathBuf>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
