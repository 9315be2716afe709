use std::collections::HashMap;
use std::io::{self, Read as _};
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context as _};
use lazy_static::lazy_static;
use maplit::hashmap;
use serde::Serialize;
use tempfile::TempDir;

use crate::abs_path::AbsPathBuf;
use crate::mirror::SourceMirror;
use crate::model::LangIdRef;
use crate::{Console, Result};

static FALLBACK_HINT: &str = "program.cpp";

lazy_static! {
    static ref EXTENSION_HINTS: HashMap<&'static str, &'static str> = hashmap! {
        "3" => "program.dpr",
        "4" => "program.pas",
        "6" => "program.php",
        "7" => "program.py",
        "9" => "program.cs",
        "12" => "program.hs",
        "13" => "program.pl",
        "19" => "program.ml",
        "20" => "program.scala",
        "28" => "program.d",
        "31" => "program.py",
        "32" => "program.go",
        "34" => "program.js",
        "36" => "program.java",
        "40" => "program.py",
        "41" => "program.py",
        "43" => "program.c",
        "48" => "program.kt",
        "49" => "program.rs",
        "50" => "program.cpp",
        "51" => "program.pas",
        "52" => "program.cpp",
        "54" => "program.cpp",
        "55" => "program.js",
        "59" => "program.cpp",
        "60" => "program.java",
        "61" => "program.cpp",
        "65" => "program.cs",
        "67" => "program.rb",
        "70" => "program.py",
        "73" => "program.cpp",
        "74" => "program.java",
        "75" => "program.rs",
        "77" => "program.kt",
        "79" => "program.cs",
        "80" => "program.c",
        "83" => "program.kt",
        "87" => "program.java",
        "88" => "program.kt",
        "89" => "program.cpp",
        "90" => "program.cpp",
        "91" => "program.cpp",
    };
}

/// File name hint for a language id, e.g. `54` is `program.cpp`.
pub fn extension_hint(lang_id: LangIdRef) -> &'static str {
    EXTENSION_HINTS
        .get(lang_id)
        .copied()
        .unwrap_or(FALLBACK_HINT)
}

/// Highlighting mode a rich editor is put in.
#[derive(
    Serialize, EnumString, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SyntaxMode {
    CCpp,
    CSharp,
    D,
    Golang,
    Haskell,
    Java,
    Javascript,
    Kotlin,
    Ocaml,
    Pascal,
    Perl,
    Php,
    Python,
    Ruby,
    Rust,
    Scala,
    Text,
}

impl SyntaxMode {
    pub fn for_path(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        match ext {
            "c" | "cpp" | "cc" | "h" | "hpp" => Self::CCpp,
            "cs" => Self::CSharp,
            "d" => Self::D,
            "go" => Self::Golang,
            "hs" => Self::Haskell,
            "java" => Self::Java,
            "js" => Self::Javascript,
            "kt" => Self::Kotlin,
            "ml" => Self::Ocaml,
            "pas" | "dpr" => Self::Pascal,
            "pl" => Self::Perl,
            "php" => Self::Php,
            "py" => Self::Python,
            "rb" => Self::Ruby,
            "rs" => Self::Rust,
            "scala" => Self::Scala,
            _ => Self::Text,
        }
    }
}

impl std::fmt::Display for SyntaxMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.into())
    }
}

/// An editing surface the source text is taken from.
pub trait Editor {
    fn current_text(&self) -> &str;

    /// Replaces the text and pushes it to the mirror.
    fn set_text(&mut self, text: &str);

    /// Hands control to the user so that the text can be edited.
    fn focus(&mut self, cnsl: &mut Console) -> Result<()>;

    fn set_language_mode(&mut self, hint: &str);
}

/// Runs an external editor on a scratch file.
#[derive(Debug)]
pub struct RichEditor {
    command: String,
    scratch_dir: TempDir,
    file_name: String,
    mode: SyntaxMode,
    text: String,
    mirror: SourceMirror,
}

impl RichEditor {
    pub fn new(command: impl Into<String>, hint: &str, mirror: SourceMirror) -> Result<Self> {
        let scratch_dir = tempfile::Builder::new()
            .prefix("cffs")
            .tempdir()
            .context("Could not create scratch directory for editor")?;
        Ok(Self {
            command: command.into(),
            scratch_dir,
            file_name: hint.to_owned(),
            mode: SyntaxMode::for_path(hint),
            text: String::new(),
            mirror,
        })
    }

    pub fn mode(&self) -> SyntaxMode {
        self.mode
    }

    pub fn scratch_path(&self) -> Result<AbsPathBuf> {
        AbsPathBuf::try_new(self.scratch_dir.path().join(&self.file_name))
    }

    fn run_command(&self, path: &AbsPathBuf) -> Result<()> {
        let words = shlex::split(&self.command)
            .with_context(|| format!("Could not parse editor command : {}", self.command))?;
        let (program, args) = words
            .split_first()
            .ok_or_else(|| anyhow!("Editor command is empty"))?;
        let status = Command::new(program)
            .args(args)
            .arg(path.as_ref())
            .status()
            .with_context(|| format!("Could not run editor : {}", self.command))?;
        if !status.success() {
            return Err(anyhow!("Editor exited with {}", status));
        }
        Ok(())
    }
}

impl Editor for RichEditor {
    fn current_text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.mirror.update(&self.text);
    }

    fn focus(&mut self, cnsl: &mut Console) -> Result<()> {
        let path = self.scratch_path()?;
        let text = self.text.clone();
        path.save(
            |mut file| {
                io::Write::write_all(&mut file, text.as_bytes())?;
                Ok(())
            },
            true,
        )?;
        cnsl.info(&format!("Editing {} ({}) with {}", path, self.mode, self.command))?;
        self.run_command(&path)?;
        let edited = path.read_to_string()?;
        self.set_text(&edited);
        Ok(())
    }

    fn set_language_mode(&mut self, hint: &str) {
        self.file_name = hint.to_owned();
        self.mode = SyntaxMode::for_path(hint);
    }
}

/// Where a plain editor reads its text from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlainSource {
    File(AbsPathBuf),
    Stdin,
}

/// Text area without any notion of language.
#[derive(Debug)]
pub struct PlainEditor {
    source: PlainSource,
    text: String,
    mirror: SourceMirror,
}

impl PlainEditor {
    pub fn new(source: PlainSource, mirror: SourceMirror) -> Self {
        Self {
            source,
            text: String::new(),
            mirror,
        }
    }

    fn read_source(&self) -> Result<String> {
        match &self.source {
            PlainSource::File(path) => path.read_to_string(),
            PlainSource::Stdin => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Could not read source from stdin")?;
                Ok(buf)
            }
        }
    }
}

impl Editor for PlainEditor {
    fn current_text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.mirror.update(&self.text);
    }

    fn focus(&mut self, _cnsl: &mut Console) -> Result<()> {
        let text = self.read_source()?;
        if !text.is_empty() {
            self.set_text(&text);
        }
        Ok(())
    }

    fn set_language_mode(&mut self, _hint: &str) {}
}

/// The editor bound to a panel, picked once per acquisition.
#[derive(Debug)]
pub enum EditorAdapter {
    Rich(RichEditor),
    Plain(PlainEditor),
}

impl EditorAdapter {
    pub fn is_rich(&self) -> bool {
        matches!(self, Self::Rich(_))
    }

    fn as_editor(&self) -> &dyn Editor {
        match self {
            Self::Rich(editor) => editor,
            Self::Plain(editor) => editor,
        }
    }

    fn as_editor_mut(&mut self) -> &mut dyn Editor {
        match self {
            Self::Rich(editor) => editor,
            Self::Plain(editor) => editor,
        }
    }
}

impl Editor for EditorAdapter {
    fn current_text(&self) -> &str {
        self.as_editor().current_text()
    }

    fn set_text(&mut self, text: &str) {
        self.as_editor_mut().set_text(text)
    }

    fn focus(&mut self, cnsl: &mut Console) -> Result<()> {
        self.as_editor_mut().focus(cnsl)
    }

    fn set_language_mode(&mut self, hint: &str) {
        self.as_editor_mut().set_language_mode(hint)
    }
}

/// Decides which editor variant a new panel gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorFactory {
    rich_command: Option<String>,
    plain_source: PlainSource,
    initial_text: String,
}

impl EditorFactory {
    pub fn new(rich_command: Option<String>, plain_source: PlainSource) -> Self {
        Self {
            rich_command,
            plain_source,
            initial_text: String::new(),
        }
    }

    pub fn with_initial_text(mut self, text: impl Into<String>) -> Self {
        self.initial_text = text.into();
        self
    }

    pub fn is_rich(&self) -> bool {
        self.rich_command.is_some()
    }

    /// Builds an editor writing into `mirror`.
    ///
    /// Text already in the mirror survives rebinding.
    pub fn bind(&self, mirror: &SourceMirror, lang_id: Option<LangIdRef>) -> Result<EditorAdapter> {
        let hint = lang_id.map(extension_hint).unwrap_or(FALLBACK_HINT);
        let mut adapter = match &self.rich_command {
            Some(command) => EditorAdapter::Rich(RichEditor::new(command, hint, mirror.clone())?),
            None => EditorAdapter::Plain(PlainEditor::new(self.plain_source.clone(), mirror.clone())),
        };
        let text = if mirror.is_blank() {
            self.initial_text.clone()
        } else {
            mirror.text()
        };
        adapter.set_text(&text);
        Ok(adapter)
    }
}
