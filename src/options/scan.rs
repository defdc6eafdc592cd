//! Scanner for tcc-style option strings
//!
//! Accepts the subset of the classic command-line surface that maps
//! onto [`CompilerOptions`]: `-I`/`-isystem`/`-L`/`-B` paths, `-l`
//! libraries, and `-D`/`-U` defines (each attached or separated), plus
//! the boolean switches `-nostdinc`, `-nostdlib`, `-v`. Uses logos for
//! tokenization.

use logos::Logos;

use super::{CompilerOptions, Flag, OptionError};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum OptToken {
    #[token("-nostdinc")]
    NoStdInc,
    #[token("-nostdlib")]
    NoStdLib,
    #[token("-v")]
    Verbose,

    // Attached-argument forms, e.g. "-Iinclude"
    #[regex(r"-I[^ \t\r\n]+", |lex| lex.slice()[2..].to_string())]
    Include(String),
    #[regex(r"-isystem[^ \t\r\n]+", |lex| lex.slice()[8..].to_string())]
    SysInclude(String),
    #[regex(r"-L[^ \t\r\n]+", |lex| lex.slice()[2..].to_string())]
    LibraryPath(String),
    #[regex(r"-B[^ \t\r\n]+", |lex| lex.slice()[2..].to_string())]
    LibRoot(String),
    #[regex(r"-l[^ \t\r\n]+", |lex| lex.slice()[2..].to_string())]
    Library(String),
    #[regex(r"-D[^ \t\r\n]+", |lex| lex.slice()[2..].to_string())]
    Define(String),
    #[regex(r"-U[^ \t\r\n]+", |lex| lex.slice()[2..].to_string())]
    Undefine(String),

    // Separated-argument forms, e.g. "-I include"
    #[token("-I")]
    IncludeNext,
    #[token("-isystem")]
    SysIncludeNext,
    #[token("-L")]
    LibraryPathNext,
    #[token("-B")]
    LibRootNext,
    #[token("-l")]
    LibraryNext,
    #[token("-D")]
    DefineNext,
    #[token("-U")]
    UndefineNext,

    #[regex(r"-[^ \t\r\n]+", |lex| lex.slice().to_string(), priority = 1)]
    Unknown(String),
    #[regex(r"[^\- \t\r\n][^ \t\r\n]*", |lex| lex.slice().to_string())]
    Word(String),
}

/// One fully resolved option, ready to fold into [`CompilerOptions`].
#[derive(Debug, Clone, PartialEq)]
enum Opt {
    Flag(Flag),
    Include(String),
    SysInclude(String),
    LibraryPath(String),
    LibRoot(String),
    Library(String),
    Define(String),
    Undefine(String),
}

/// Scan `input` and fold the recognized options into `options`.
///
/// The whole string is validated before anything is applied, so a bad
/// option leaves `options` untouched.
pub fn parse_option_string(
    options: &mut CompilerOptions,
    input: &str,
) -> Result<(), OptionError> {
    let opts = scan(input)?;
    for opt in opts {
        apply(options, opt);
    }
    Ok(())
}

fn scan(input: &str) -> Result<Vec<Opt>, OptionError> {
    let mut lexer = OptToken::lexer(input);
    let mut opts = Vec::new();

    while let Some(result) = lexer.next() {
        let token = match result {
            Ok(token) => token,
            Err(()) => {
                return Err(OptionError::new(format!(
                    "unexpected character in option string: {:?}",
                    &input[lexer.span()]
                )));
            }
        };

        let opt = match token {
            OptToken::NoStdInc => Opt::Flag(Flag::NoStdInc),
            OptToken::NoStdLib => Opt::Flag(Flag::NoStdLib),
            OptToken::Verbose => Opt::Flag(Flag::Verbose),
            OptToken::Include(arg) => Opt::Include(arg),
            OptToken::SysInclude(arg) => Opt::SysInclude(arg),
            OptToken::LibraryPath(arg) => Opt::LibraryPath(arg),
            OptToken::LibRoot(arg) => Opt::LibRoot(arg),
            OptToken::Library(arg) => Opt::Library(arg),
            OptToken::Define(arg) => Opt::Define(arg),
            OptToken::Undefine(arg) => Opt::Undefine(arg),
            OptToken::IncludeNext => Opt::Include(expect_arg(&mut lexer, "-I")?),
            OptToken::SysIncludeNext => Opt::SysInclude(expect_arg(&mut lexer, "-isystem")?),
            OptToken::LibraryPathNext => Opt::LibraryPath(expect_arg(&mut lexer, "-L")?),
            OptToken::LibRootNext => Opt::LibRoot(expect_arg(&mut lexer, "-B")?),
            OptToken::LibraryNext => Opt::Library(expect_arg(&mut lexer, "-l")?),
            OptToken::DefineNext => Opt::Define(expect_arg(&mut lexer, "-D")?),
            OptToken::UndefineNext => Opt::Undefine(expect_arg(&mut lexer, "-U")?),
            OptToken::Unknown(opt) => {
                return Err(OptionError::new(format!("unknown option: {}", opt)));
            }
            OptToken::Word(word) => {
                return Err(OptionError::new(format!("unexpected argument: {}", word)));
            }
        };
        opts.push(opt);
    }

    Ok(opts)
}

/// Pull the argument of a separated-form option off the token stream.
fn expect_arg(lexer: &mut logos::Lexer<'_, OptToken>, option: &str) -> Result<String, OptionError> {
    match lexer.next() {
        Some(Ok(OptToken::Word(word))) => Ok(word),
        _ => Err(OptionError::new(format!(
            "option '{}' expects an argument",
            option
        ))),
    }
}

fn apply(options: &mut CompilerOptions, opt: Opt) {
    match opt {
        Opt::Flag(flag) => options.set_flag(flag, true),
        Opt::Include(path) => options.include_paths.push(path.into()),
        Opt::SysInclude(path) => options.sysinclude_paths.push(path.into()),
        Opt::LibraryPath(path) => options.library_paths.push(path.into()),
        Opt::LibRoot(path) => options.lib_root = Some(path.into()),
        Opt::Library(name) => options.libraries.push(name),
        Opt::Define(def) => match def.split_once('=') {
            Some((name, value)) => options.define(name, value),
            None => options.define(def, ""),
        },
        Opt::Undefine(name) => options.undefine(&name),
    }
}
