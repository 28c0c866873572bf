// src/services/document_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{
    common::{error::AppError, pricing},
    models::quote::Quote,
    services::quote_service::QuoteService,
};

fn render_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

/// Dados fixos do cabeçalho e do rodapé do PDF.
#[derive(Debug, Clone, Default)]
pub struct DocumentSettings {
    pub fonts_dir: PathBuf,
    pub company_name: Option<String>,
    pub pix_key: Option<String>,
}

#[derive(Clone)]
pub struct DocumentService {
    quotes: QuoteService,
    settings: DocumentSettings,
}

impl DocumentService {
    pub fn new(quotes: QuoteService, settings: DocumentSettings) -> Self {
        Self { quotes, settings }
    }

    pub async fn generate_quote_pdf(&self, quote_number: &str) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados
        let quote = self
            .quotes
            .get_quote(quote_number)
            .await?
            .ok_or_else(|| AppError::QuoteNotFound(quote_number.to_string()))?;

        // 2. Monta o PDF (fonte carregada da pasta configurada)
        let font_family = genpdf::fonts::from_files(&self.settings.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(format!("Fonte Roboto não encontrada em {}", self.settings.fonts_dir.display())))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Orçamento #{}", quote.id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        self.push_header(&mut doc, &quote);
        push_items(&mut doc, &quote)?;
        self.push_payment(&mut doc)?;

        // --- RODAPÉ ---
        doc.push(elements::Break::new(2));
        doc.push(
            elements::Paragraph::new(format!(
                "Orçamento válido até {}. Após essa data os valores podem ser revistos.",
                quote.client.valid_until.format("%d/%m/%Y")
            ))
            .styled(style::Style::new().italic().with_font_size(8)),
        );

        // 3. Renderiza em memória
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(render_error)?;

        tracing::info!("PDF do orçamento {} gerado ({} bytes)", quote.id, buffer.len());
        Ok(buffer)
    }

    fn push_header(&self, doc: &mut genpdf::Document, quote: &Quote) {
        let title = self
            .settings
            .company_name
            .clone()
            .unwrap_or_else(|| "ORÇAMENTOS ELÉTRICOS".to_string());
        doc.push(elements::Paragraph::new(title).styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("ORÇAMENTO #{} ({})", quote.id, quote.status_label))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!("Data: {}", quote.created_at.format("%d/%m/%Y"))));
        doc.push(elements::Paragraph::new(format!(
            "Válido até: {}",
            quote.client.valid_until.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", quote.client.name)));
        doc.push(elements::Paragraph::new(format!("Telefone: {}", quote.client.phone)));
        doc.push(elements::Paragraph::new(format!(
            "Endereço: {} ({})",
            quote.client.address,
            quote.client.location_type.label()
        )));
        doc.push(elements::Break::new(2));
    }

    fn push_payment(&self, doc: &mut genpdf::Document) -> Result<(), AppError> {
        let Some(key) = &self.settings.pix_key else {
            return Ok(());
        };

        doc.push(elements::Break::new(2));
        doc.push(elements::Paragraph::new("PAGAMENTO VIA PIX").styled(style::Style::new().bold().with_font_size(12)));
        doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
        doc.push(elements::Break::new(1));

        // QR Code com o texto da chave
        let code = QrCode::new(key.as_bytes()).map_err(render_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(render_error)?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);
        Ok(())
    }
}

fn push_items(doc: &mut genpdf::Document, quote: &Quote) -> Result<(), AppError> {
    // Pesos das colunas: Item (4), Qtd (1), Unitário (2), Total (2)
    let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Item").styled(bold))
        .element(elements::Paragraph::new("Qtd").styled(bold))
        .element(elements::Paragraph::new("Unitário").styled(bold))
        .element(elements::Paragraph::new("Total").styled(bold))
        .push()
        .map_err(render_error)?;

    for item in &quote.items {
        let product = &item.catalog_item;
        let name = if product.brand.is_empty() {
            product.name.clone()
        } else {
            format!("{} ({})", product.name, product.brand)
        };
        table
            .row()
            .element(elements::Paragraph::new(name))
            .element(elements::Paragraph::new(format!("{} {}", item.quantity, product.unit.label())))
            .element(elements::Paragraph::new(pricing::format_brl(product.price)))
            .element(elements::Paragraph::new(pricing::format_brl(item.line_total())))
            .push()
            .map_err(render_error)?;
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    let subtotals = [
        ("Materiais", pricing::materials_subtotal(&quote.items)),
        ("Serviços", pricing::services_subtotal(&quote.items)),
    ];
    for (label, value) in subtotals {
        let mut line = elements::Paragraph::new(format!("{}: {}", label, pricing::format_brl(value)));
        line.set_alignment(genpdf::Alignment::Right);
        doc.push(line);
    }

    let mut total = elements::Paragraph::new(format!("TOTAL GERAL: {}", pricing::format_brl(quote.total_value)));
    total.set_alignment(genpdf::Alignment::Right);
    doc.push(total.styled(style::Style::new().bold().with_font_size(12)));
    Ok(())
}
