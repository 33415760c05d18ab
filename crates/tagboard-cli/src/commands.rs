use anyhow::{Context, Result, bail};

use tagboard_core::{BoardConfig, BoardSession, HttpCatalog, Post, PostCatalog, Search};

use crate::cli::{Cli, Commands, SearchArgs, ShowArgs};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.url.as_deref())?;
    match cli.command {
        Commands::Search(args) => run_search(config, args),
        Commands::Show(args) => run_show(config, args),
    }
}

fn resolve_config(url: Option<&str>) -> Result<BoardConfig> {
    if let Some(url) = url {
        return Ok(BoardConfig::new(url));
    }
    BoardConfig::from_env().context("no board URL given; pass --url or set TAGBOARD_URL")
}

fn run_search(config: BoardConfig, args: SearchArgs) -> Result<()> {
    let session = BoardSession::connect(config)?;
    session
        .search_posts(Search::new(args.tags, args.exclude))
        .context("search failed")?;

    let landed = if args.last {
        session.load_last_page()?
    } else {
        session.load_page(args.page)?
    };
    if !landed {
        bail!("requested page is not available for this search");
    }

    let posts = session.posts();
    if posts.is_empty() {
        println!("no posts matched");
        return Ok(());
    }
    for post in &posts {
        println!("{}", format_post_line(post));
    }
    println!();
    println!(
        "{}",
        format_pager(
            session.current_page(),
            session.page_count(),
            &session.page_window()
        )
    );
    Ok(())
}

fn run_show(config: BoardConfig, args: ShowArgs) -> Result<()> {
    let catalog = HttpCatalog::new(config)?;
    let post = catalog.get_post(args.id)?;
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}

fn format_post_line(post: &Post) -> String {
    let label = post.title.as_deref().unwrap_or(&post.filename);
    format!(
        "{:>8}  {:<12}  {}  [{}]",
        post.id,
        post.user_name,
        label,
        post.tags.join(" ")
    )
}

fn format_pager(current: i32, count: i32, window: &[i32]) -> String {
    let marks = window
        .iter()
        .map(|no| {
            if *no == current {
                format!("[{no}]")
            } else {
                no.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("page {current}/{count}  {marks}")
}
