// tests/cht_cards.rs
// Traditional Chinese card pages against saved fixtures.
use card_scrape::card::{EvolutionStage, Modifier, Supertype};
use card_scrape::{Pipeline, Source};

const CHARMELEON: &str = include_str!("fixtures/cht_charmeleon.html");
const PROFESSOR: &str = include_str!("fixtures/cht_professor.html");

#[test]
fn creature_page_fields() {
    let card = Pipeline::default().parse(Source::Cht, CHARMELEON, "3962").unwrap();

    assert_eq!(card.name.as_deref(), Some("火恐龍"));
    assert_eq!(card.supertype(), Supertype::Creature);
    assert_eq!(card.subtype, None);
    assert_eq!(card.set_code.as_deref(), Some("G"));
    assert_eq!(card.card_number.as_deref(), Some("027/108"));
    assert_eq!(card.set_name.as_deref(), Some("強化擴充包「黑焰支配者」"));
    assert_eq!(card.author.as_deref(), Some("Kurata So"));
    assert_eq!(card.image_url.as_deref(), Some("https://asia.pokemon-card.com/tw/card-img/tw00003962.png"));
    assert_eq!(card.add_rule, None);

    let c = card.creature().unwrap();
    assert_eq!(c.hp.as_deref(), Some("90"));
    assert_eq!(c.color, vec!["炎"]);
    assert_eq!(c.evolution_stage, Some(EvolutionStage::Stage1));
    assert_eq!(c.weaknesses, Some(Modifier::weakness("水", "2")));
    assert_eq!(c.resistances, None);
    assert_eq!(c.retreat_cost, vec!["無", "無"]);
}

#[test]
fn pre_evolutions_come_from_enclosing_lists() {
    let card = Pipeline::default().parse(Source::Cht, CHARMELEON, "3962").unwrap();
    let c = card.creature().unwrap();
    assert_eq!(c.evolves_from, vec!["小火龍"]);
    assert!(c.evolves_to.is_empty());
}

#[test]
fn attacks_in_page_order() {
    let card = Pipeline::default().parse(Source::Cht, CHARMELEON, "3962").unwrap();
    let attacks = &card.creature().unwrap().attacks;
    let names: Vec<&str> = attacks.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["燃燒", "火焰之尾"]);
    assert_eq!(attacks[0].cost, vec!["炎"]);
    assert_eq!(attacks[0].text, "");
    assert_eq!(attacks[1].cost, vec!["炎", "無"]);
    assert_eq!(attacks[1].damage, "50");
    assert_eq!(attacks[1].text, "擲1次硬幣若為反面，則這個招式失敗。");
}

#[test]
fn supporter_effect_text() {
    let card = Pipeline::default().parse(Source::Cht, PROFESSOR, "4001").unwrap();
    assert_eq!(card.supertype(), Supertype::Trainer);
    assert_eq!(card.subtype.as_deref(), Some("supporter"));
    let text = card.trainer().unwrap().text.clone().unwrap();
    assert!(text.starts_with("將自己的手牌全部丟棄"));
    assert!(text.ends_with("從牌庫抽出7張卡。"));
}

#[test]
fn verbatim_rule_block_wins_over_inference() {
    let html = r#"<h1 class="pageHeader cardDetail"><span class="evolveMarker">基礎</span>密勒頓ex</h1>
        <div class="skillInformation">
          <div class="skill"><span class="skillName">[寶可夢ex規則]</span>
            <p class="skillEffect">寶可夢ex昏厥時，對手獲得2張獎賞卡。【自訂】</p></div>
        </div>"#;
    let card = Pipeline::default().parse(Source::Cht, html, "1").unwrap();
    assert_eq!(card.subtype.as_deref(), Some("ex"));
    assert_eq!(card.add_rule.as_deref(), Some("寶可夢ex昏厥時，對手獲得2張獎賞卡。自訂"));
    assert!(card.creature().unwrap().attacks.is_empty());
}

#[test]
fn inferred_rule_without_block() {
    let html = r#"<h1 class="pageHeader cardDetail"><span class="evolveMarker">基礎</span>密勒頓ex</h1>"#;
    let card = Pipeline::default().parse(Source::Cht, html, "1").unwrap();
    assert_eq!(card.add_rule.as_deref(), Some("寶可夢ex昏厥時，對手獲得2張獎賞卡。"));
    assert_eq!(card.creature().unwrap().evolution_stage, None);
}
